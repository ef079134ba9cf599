//! Storage wrapper that records every call it receives.

use async_trait::async_trait;
use parking_lot::Mutex;
use streamgate::db::DbError;
use streamgate::model::{Device, DeviceFlags, PhoneCarrier, Stream, User};
use streamgate::storage::{MemoryStorage, Storage};

/// Delegates to a [`MemoryStorage`] and logs each call as
/// `"method(args)"`.
#[derive(Default)]
pub struct RecordingStorage {
    inner: MemoryStorage,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Direct access for fixture setup, bypassing the log.
    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, DbError> {
        self.record(format!("create_user({name}, {email})"));
        self.inner.create_user(name, email, password).await
    }

    async fn read_user_by_name(&self, name: &str) -> Result<User, DbError> {
        self.record(format!("read_user_by_name({name})"));
        self.inner.read_user_by_name(name).await
    }

    async fn read_user_by_id(&self, id: i64) -> Result<User, DbError> {
        self.record(format!("read_user_by_id({id})"));
        self.inner.read_user_by_id(id).await
    }

    async fn read_user_by_email(&self, email: &str) -> Result<User, DbError> {
        self.record(format!("read_user_by_email({email})"));
        self.inner.read_user_by_email(email).await
    }

    async fn read_all_users(&self) -> Result<Vec<User>, DbError> {
        self.record("read_all_users()".to_string());
        self.inner.read_all_users().await
    }

    async fn update_user(&self, user: &User) -> Result<(), DbError> {
        self.record(format!("update_user({})", user.id));
        self.inner.update_user(user).await
    }

    async fn delete_user(&self, id: i64) -> Result<(), DbError> {
        self.record(format!("delete_user({id})"));
        self.inner.delete_user(id).await
    }

    async fn create_phone_carrier(
        &self,
        name: &str,
        email_domain: &str,
    ) -> Result<PhoneCarrier, DbError> {
        self.record(format!("create_phone_carrier({name}, {email_domain})"));
        self.inner.create_phone_carrier(name, email_domain).await
    }

    async fn read_phone_carrier_by_id(&self, id: i64) -> Result<PhoneCarrier, DbError> {
        self.record(format!("read_phone_carrier_by_id({id})"));
        self.inner.read_phone_carrier_by_id(id).await
    }

    async fn read_all_phone_carriers(&self) -> Result<Vec<PhoneCarrier>, DbError> {
        self.record("read_all_phone_carriers()".to_string());
        self.inner.read_all_phone_carriers().await
    }

    async fn update_phone_carrier(&self, carrier: &PhoneCarrier) -> Result<(), DbError> {
        self.record(format!("update_phone_carrier({})", carrier.id));
        self.inner.update_phone_carrier(carrier).await
    }

    async fn delete_phone_carrier(&self, id: i64) -> Result<(), DbError> {
        self.record(format!("delete_phone_carrier({id})"));
        self.inner.delete_phone_carrier(id).await
    }

    async fn create_device(&self, name: &str, user_id: i64) -> Result<Device, DbError> {
        self.record(format!("create_device({name}, {user_id})"));
        self.inner.create_device(name, user_id).await
    }

    async fn read_device_by_id(&self, id: i64) -> Result<Device, DbError> {
        self.record(format!("read_device_by_id({id})"));
        self.inner.read_device_by_id(id).await
    }

    async fn read_device_by_api_key(&self, api_key: &str) -> Result<Device, DbError> {
        self.record("read_device_by_api_key(..)".to_string());
        self.inner.read_device_by_api_key(api_key).await
    }

    async fn read_devices_for_user(&self, user_id: i64) -> Result<Vec<Device>, DbError> {
        self.record(format!("read_devices_for_user({user_id})"));
        self.inner.read_devices_for_user(user_id).await
    }

    async fn read_device_for_user_by_name(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Device, DbError> {
        self.record(format!("read_device_for_user_by_name({user_id}, {name})"));
        self.inner.read_device_for_user_by_name(user_id, name).await
    }

    async fn update_device(&self, user_id: i64, device: &Device) -> Result<(), DbError> {
        self.record(format!("update_device({user_id}, {})", device.id));
        self.inner.update_device(user_id, device).await
    }

    async fn set_device_flags(&self, id: i64, flags: DeviceFlags) -> Result<(), DbError> {
        self.record(format!("set_device_flags({id})"));
        self.inner.set_device_flags(id, flags).await
    }

    async fn delete_device(&self, user_id: i64, id: i64) -> Result<(), DbError> {
        self.record(format!("delete_device({user_id}, {id})"));
        self.inner.delete_device(user_id, id).await
    }

    async fn create_stream(
        &self,
        name: &str,
        stream_type: &str,
        device_id: i64,
    ) -> Result<Stream, DbError> {
        self.record(format!("create_stream({name}, {stream_type}, {device_id})"));
        self.inner.create_stream(name, stream_type, device_id).await
    }

    async fn read_stream_by_id(&self, id: i64) -> Result<Stream, DbError> {
        self.record(format!("read_stream_by_id({id})"));
        self.inner.read_stream_by_id(id).await
    }

    async fn read_streams_by_device(&self, device_id: i64) -> Result<Vec<Stream>, DbError> {
        self.record(format!("read_streams_by_device({device_id})"));
        self.inner.read_streams_by_device(device_id).await
    }

    async fn read_stream_by_device_and_name(
        &self,
        device_id: i64,
        name: &str,
    ) -> Result<Stream, DbError> {
        self.record(format!("read_stream_by_device_and_name({device_id}, {name})"));
        self.inner.read_stream_by_device_and_name(device_id, name).await
    }

    async fn update_stream(&self, device_id: i64, stream: &Stream) -> Result<(), DbError> {
        self.record(format!("update_stream({device_id}, {})", stream.id));
        self.inner.update_stream(device_id, stream).await
    }

    async fn delete_stream(&self, device_id: i64, id: i64) -> Result<(), DbError> {
        self.record(format!("delete_stream({device_id}, {id})"));
        self.inner.delete_stream(device_id, id).await
    }
}
