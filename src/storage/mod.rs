//! Storage abstraction consumed by the [`Operator`](crate::operator::Operator).
//!
//! The contract is plain CRUD over users, devices, streams and phone
//! carriers. It performs no authorization. Missing records are reported as
//! the matching `*NotFound` [`DbError`] and uniqueness violations as the
//! matching `*Exists` error. Implementations must be safe for concurrent use.
//!
//! Writes to an owned record name the owner as well as the record id. A
//! record whose owner does not match is reported as not found.

use crate::db::DbError;
use crate::model::{Device, DeviceFlags, PhoneCarrier, Stream, User};
use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    // Users

    async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, DbError>;
    async fn read_user_by_name(&self, name: &str) -> Result<User, DbError>;
    async fn read_user_by_id(&self, id: i64) -> Result<User, DbError>;
    async fn read_user_by_email(&self, email: &str) -> Result<User, DbError>;
    async fn read_all_users(&self) -> Result<Vec<User>, DbError>;
    async fn update_user(&self, user: &User) -> Result<(), DbError>;
    /// Deletes the user together with its devices and their streams.
    async fn delete_user(&self, id: i64) -> Result<(), DbError>;

    // Phone carriers

    async fn create_phone_carrier(
        &self,
        name: &str,
        email_domain: &str,
    ) -> Result<PhoneCarrier, DbError>;
    async fn read_phone_carrier_by_id(&self, id: i64) -> Result<PhoneCarrier, DbError>;
    async fn read_all_phone_carriers(&self) -> Result<Vec<PhoneCarrier>, DbError>;
    async fn update_phone_carrier(&self, carrier: &PhoneCarrier) -> Result<(), DbError>;
    async fn delete_phone_carrier(&self, id: i64) -> Result<(), DbError>;

    // Devices

    /// Creates an enabled, unprivileged device with a freshly generated API key.
    async fn create_device(&self, name: &str, user_id: i64) -> Result<Device, DbError>;
    async fn read_device_by_id(&self, id: i64) -> Result<Device, DbError>;
    async fn read_device_by_api_key(&self, api_key: &str) -> Result<Device, DbError>;
    async fn read_devices_for_user(&self, user_id: i64) -> Result<Vec<Device>, DbError>;
    async fn read_device_for_user_by_name(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Device, DbError>;
    /// Writes name and API key back to the device `device.id` of `user_id`.
    async fn update_device(&self, user_id: i64, device: &Device) -> Result<(), DbError>;
    async fn set_device_flags(&self, id: i64, flags: DeviceFlags) -> Result<(), DbError>;
    /// Deletes the device `id` of `user_id` together with its streams.
    async fn delete_device(&self, user_id: i64, id: i64) -> Result<(), DbError>;

    // Streams

    async fn create_stream(
        &self,
        name: &str,
        stream_type: &str,
        device_id: i64,
    ) -> Result<Stream, DbError>;
    async fn read_stream_by_id(&self, id: i64) -> Result<Stream, DbError>;
    async fn read_streams_by_device(&self, device_id: i64) -> Result<Vec<Stream>, DbError>;
    async fn read_stream_by_device_and_name(
        &self,
        device_id: i64,
        name: &str,
    ) -> Result<Stream, DbError>;
    /// Writes name and type back to the stream `stream.id` of `device_id`.
    async fn update_stream(&self, device_id: i64, stream: &Stream) -> Result<(), DbError>;
    async fn delete_stream(&self, device_id: i64, id: i64) -> Result<(), DbError>;
}
