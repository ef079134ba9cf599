//! [`Storage`] over the SQLite repositories.

use super::{Database, DbError};
use crate::model::{Device, DeviceFlags, PhoneCarrier, Stream, User};
use crate::storage::Storage;
use async_trait::async_trait;

/// Turn a `false` "row matched" result into the given not-found error.
fn matched(found: bool, missing: impl FnOnce() -> DbError) -> Result<(), DbError> {
    if found { Ok(()) } else { Err(missing()) }
}

#[async_trait]
impl Storage for Database {
    async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, DbError> {
        self.users().create(name, email, password).await
    }

    async fn read_user_by_name(&self, name: &str) -> Result<User, DbError> {
        self.users()
            .find_by_name(name)
            .await?
            .ok_or_else(|| DbError::UserNotFound(name.to_string()))
    }

    async fn read_user_by_id(&self, id: i64) -> Result<User, DbError> {
        self.users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DbError::UserNotFound(id.to_string()))
    }

    async fn read_user_by_email(&self, email: &str) -> Result<User, DbError> {
        self.users()
            .find_by_email(email)
            .await?
            .ok_or_else(|| DbError::UserNotFound(email.to_string()))
    }

    async fn read_all_users(&self) -> Result<Vec<User>, DbError> {
        self.users().load_all().await
    }

    async fn update_user(&self, user: &User) -> Result<(), DbError> {
        let found = self.users().update(user).await?;
        matched(found, || DbError::UserNotFound(user.id.to_string()))
    }

    async fn delete_user(&self, id: i64) -> Result<(), DbError> {
        let found = self.users().delete(id).await?;
        matched(found, || DbError::UserNotFound(id.to_string()))
    }

    async fn create_phone_carrier(
        &self,
        name: &str,
        email_domain: &str,
    ) -> Result<PhoneCarrier, DbError> {
        self.carriers().create(name, email_domain).await
    }

    async fn read_phone_carrier_by_id(&self, id: i64) -> Result<PhoneCarrier, DbError> {
        self.carriers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DbError::CarrierNotFound(id.to_string()))
    }

    async fn read_all_phone_carriers(&self) -> Result<Vec<PhoneCarrier>, DbError> {
        self.carriers().load_all().await
    }

    async fn update_phone_carrier(&self, carrier: &PhoneCarrier) -> Result<(), DbError> {
        let found = self.carriers().update(carrier).await?;
        matched(found, || DbError::CarrierNotFound(carrier.id.to_string()))
    }

    async fn delete_phone_carrier(&self, id: i64) -> Result<(), DbError> {
        let found = self.carriers().delete(id).await?;
        matched(found, || DbError::CarrierNotFound(id.to_string()))
    }

    async fn create_device(&self, name: &str, user_id: i64) -> Result<Device, DbError> {
        self.devices().create(name, user_id).await
    }

    async fn read_device_by_id(&self, id: i64) -> Result<Device, DbError> {
        self.devices()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DbError::DeviceNotFound(id.to_string()))
    }

    async fn read_device_by_api_key(&self, api_key: &str) -> Result<Device, DbError> {
        // The key itself is a credential; keep it out of the error text.
        self.devices()
            .find_by_api_key(api_key)
            .await?
            .ok_or_else(|| DbError::DeviceNotFound("<api key>".to_string()))
    }

    async fn read_devices_for_user(&self, user_id: i64) -> Result<Vec<Device>, DbError> {
        self.devices().load_for_user(user_id).await
    }

    async fn read_device_for_user_by_name(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Device, DbError> {
        self.devices()
            .find_for_user_by_name(user_id, name)
            .await?
            .ok_or_else(|| DbError::DeviceNotFound(name.to_string()))
    }

    async fn update_device(&self, user_id: i64, device: &Device) -> Result<(), DbError> {
        let found = self.devices().update(user_id, device).await?;
        matched(found, || DbError::DeviceNotFound(device.id.to_string()))
    }

    async fn set_device_flags(&self, id: i64, flags: DeviceFlags) -> Result<(), DbError> {
        let found = self.devices().set_flags(id, flags).await?;
        matched(found, || DbError::DeviceNotFound(id.to_string()))
    }

    async fn delete_device(&self, user_id: i64, id: i64) -> Result<(), DbError> {
        let found = self.devices().delete(user_id, id).await?;
        matched(found, || DbError::DeviceNotFound(id.to_string()))
    }

    async fn create_stream(
        &self,
        name: &str,
        stream_type: &str,
        device_id: i64,
    ) -> Result<Stream, DbError> {
        self.streams().create(name, stream_type, device_id).await
    }

    async fn read_stream_by_id(&self, id: i64) -> Result<Stream, DbError> {
        self.streams()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DbError::StreamNotFound(id.to_string()))
    }

    async fn read_streams_by_device(&self, device_id: i64) -> Result<Vec<Stream>, DbError> {
        self.streams().load_for_device(device_id).await
    }

    async fn read_stream_by_device_and_name(
        &self,
        device_id: i64,
        name: &str,
    ) -> Result<Stream, DbError> {
        self.streams()
            .find_for_device_by_name(device_id, name)
            .await?
            .ok_or_else(|| DbError::StreamNotFound(name.to_string()))
    }

    async fn update_stream(&self, device_id: i64, stream: &Stream) -> Result<(), DbError> {
        let found = self.streams().update(device_id, stream).await?;
        matched(found, || DbError::StreamNotFound(stream.id.to_string()))
    }

    async fn delete_stream(&self, device_id: i64, id: i64) -> Result<(), DbError> {
        let found = self.streams().delete(device_id, id).await?;
        matched(found, || DbError::StreamNotFound(id.to_string()))
    }
}
