//! In-process storage with the same semantics as the SQLite database.
//!
//! Ids are assigned per table starting at 1. Deletes cascade from users to
//! devices to streams, like the `ON DELETE CASCADE` schema.

use super::Storage;
use crate::db::{DbError, generate_api_key, hash_password};
use crate::model::{Device, DeviceFlags, PhoneCarrier, Stream, User};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    devices: Table<Device>,
    streams: Table<Stream>,
    carriers: Table<PhoneCarrier>,
}

impl Tables {
    fn user_conflict(&self, id: i64, name: &str, email: &str) -> bool {
        self.users.rows.values().any(|u| {
            u.id != id && (u.name.eq_ignore_ascii_case(name) || u.email.eq_ignore_ascii_case(email))
        })
    }

    fn device_conflict(&self, id: i64, user_id: i64, name: &str, api_key: &str) -> bool {
        self.devices.rows.values().any(|d| {
            d.id != id && (d.api_key == api_key || (d.user_id == user_id && d.name == name))
        })
    }

    fn stream_conflict(&self, id: i64, device_id: i64, name: &str) -> bool {
        self.streams
            .rows
            .values()
            .any(|s| s.id != id && s.device_id == device_id && s.name == name)
    }

    fn carrier_conflict(&self, id: i64, name: &str, email_domain: &str) -> bool {
        self.carriers
            .rows
            .values()
            .any(|c| c.id != id && (c.name == name || c.email_domain == email_domain))
    }

    fn device_owned(&self, id: i64, user_id: i64) -> bool {
        self.devices.rows.get(&id).is_some_and(|d| d.user_id == user_id)
    }

    fn stream_owned(&self, id: i64, device_id: i64) -> bool {
        self.streams.rows.get(&id).is_some_and(|s| s.device_id == device_id)
    }

    fn remove_device(&mut self, id: i64) -> bool {
        if self.devices.rows.remove(&id).is_none() {
            return false;
        }
        self.streams.rows.retain(|_, s| s.device_id != id);
        true
    }
}

/// [`Storage`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, DbError> {
        let password_hash = hash_password(password)?;
        let mut tables = self.tables.write();
        if tables.user_conflict(0, name, email) {
            return Err(DbError::UserExists(name.to_string()));
        }
        let user = User {
            id: tables.users.allocate(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: now(),
        };
        tables.users.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn read_user_by_name(&self, name: &str) -> Result<User, DbError> {
        self.tables
            .read()
            .users
            .rows
            .values()
            .find(|u| u.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| DbError::UserNotFound(name.to_string()))
    }

    async fn read_user_by_id(&self, id: i64) -> Result<User, DbError> {
        self.tables
            .read()
            .users
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::UserNotFound(id.to_string()))
    }

    async fn read_user_by_email(&self, email: &str) -> Result<User, DbError> {
        self.tables
            .read()
            .users
            .rows
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| DbError::UserNotFound(email.to_string()))
    }

    async fn read_all_users(&self) -> Result<Vec<User>, DbError> {
        Ok(self.tables.read().users.rows.values().cloned().collect())
    }

    async fn update_user(&self, user: &User) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        if !tables.users.rows.contains_key(&user.id) {
            return Err(DbError::UserNotFound(user.id.to_string()));
        }
        if tables.user_conflict(user.id, &user.name, &user.email) {
            return Err(DbError::UserExists(user.name.clone()));
        }
        if let Some(row) = tables.users.rows.get_mut(&user.id) {
            row.name = user.name.clone();
            row.email = user.email.clone();
            row.password_hash = user.password_hash.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        if tables.users.rows.remove(&id).is_none() {
            return Err(DbError::UserNotFound(id.to_string()));
        }
        let owned: Vec<i64> = tables
            .devices
            .rows
            .values()
            .filter(|d| d.user_id == id)
            .map(|d| d.id)
            .collect();
        for device_id in owned {
            tables.remove_device(device_id);
        }
        Ok(())
    }

    async fn create_phone_carrier(
        &self,
        name: &str,
        email_domain: &str,
    ) -> Result<PhoneCarrier, DbError> {
        let mut tables = self.tables.write();
        if tables.carrier_conflict(0, name, email_domain) {
            return Err(DbError::CarrierExists(name.to_string()));
        }
        let carrier = PhoneCarrier {
            id: tables.carriers.allocate(),
            name: name.to_string(),
            email_domain: email_domain.to_string(),
        };
        tables.carriers.rows.insert(carrier.id, carrier.clone());
        Ok(carrier)
    }

    async fn read_phone_carrier_by_id(&self, id: i64) -> Result<PhoneCarrier, DbError> {
        self.tables
            .read()
            .carriers
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::CarrierNotFound(id.to_string()))
    }

    async fn read_all_phone_carriers(&self) -> Result<Vec<PhoneCarrier>, DbError> {
        Ok(self.tables.read().carriers.rows.values().cloned().collect())
    }

    async fn update_phone_carrier(&self, carrier: &PhoneCarrier) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        if !tables.carriers.rows.contains_key(&carrier.id) {
            return Err(DbError::CarrierNotFound(carrier.id.to_string()));
        }
        if tables.carrier_conflict(carrier.id, &carrier.name, &carrier.email_domain) {
            return Err(DbError::CarrierExists(carrier.name.clone()));
        }
        tables.carriers.rows.insert(carrier.id, carrier.clone());
        Ok(())
    }

    async fn delete_phone_carrier(&self, id: i64) -> Result<(), DbError> {
        match self.tables.write().carriers.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DbError::CarrierNotFound(id.to_string())),
        }
    }

    async fn create_device(&self, name: &str, user_id: i64) -> Result<Device, DbError> {
        let mut tables = self.tables.write();
        if !tables.users.rows.contains_key(&user_id) {
            return Err(DbError::UserNotFound(user_id.to_string()));
        }
        let api_key = generate_api_key();
        if tables.device_conflict(0, user_id, name, &api_key) {
            return Err(DbError::DeviceExists(name.to_string()));
        }
        let device = Device {
            id: tables.devices.allocate(),
            name: name.to_string(),
            api_key,
            user_id,
            enabled: true,
            is_admin: false,
            user_proxy: false,
            created_at: now(),
        };
        tables.devices.rows.insert(device.id, device.clone());
        Ok(device)
    }

    async fn read_device_by_id(&self, id: i64) -> Result<Device, DbError> {
        self.tables
            .read()
            .devices
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::DeviceNotFound(id.to_string()))
    }

    async fn read_device_by_api_key(&self, api_key: &str) -> Result<Device, DbError> {
        self.tables
            .read()
            .devices
            .rows
            .values()
            .find(|d| d.api_key == api_key)
            .cloned()
            .ok_or_else(|| DbError::DeviceNotFound("<api key>".to_string()))
    }

    async fn read_devices_for_user(&self, user_id: i64) -> Result<Vec<Device>, DbError> {
        Ok(self
            .tables
            .read()
            .devices
            .rows
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn read_device_for_user_by_name(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<Device, DbError> {
        self.tables
            .read()
            .devices
            .rows
            .values()
            .find(|d| d.user_id == user_id && d.name == name)
            .cloned()
            .ok_or_else(|| DbError::DeviceNotFound(name.to_string()))
    }

    async fn update_device(&self, user_id: i64, device: &Device) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        if !tables.device_owned(device.id, user_id) {
            return Err(DbError::DeviceNotFound(device.id.to_string()));
        }
        if tables.device_conflict(device.id, user_id, &device.name, &device.api_key) {
            return Err(DbError::DeviceExists(device.name.clone()));
        }
        if let Some(row) = tables.devices.rows.get_mut(&device.id) {
            row.name = device.name.clone();
            row.api_key = device.api_key.clone();
        }
        Ok(())
    }

    async fn set_device_flags(&self, id: i64, flags: DeviceFlags) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        let row = tables
            .devices
            .rows
            .get_mut(&id)
            .ok_or_else(|| DbError::DeviceNotFound(id.to_string()))?;
        row.enabled = flags.enabled;
        row.is_admin = flags.is_admin;
        row.user_proxy = flags.user_proxy;
        Ok(())
    }

    async fn delete_device(&self, user_id: i64, id: i64) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        if tables.device_owned(id, user_id) && tables.remove_device(id) {
            Ok(())
        } else {
            Err(DbError::DeviceNotFound(id.to_string()))
        }
    }

    async fn create_stream(
        &self,
        name: &str,
        stream_type: &str,
        device_id: i64,
    ) -> Result<Stream, DbError> {
        let mut tables = self.tables.write();
        if !tables.devices.rows.contains_key(&device_id) {
            return Err(DbError::DeviceNotFound(device_id.to_string()));
        }
        if tables.stream_conflict(0, device_id, name) {
            return Err(DbError::StreamExists(name.to_string()));
        }
        let stream = Stream {
            id: tables.streams.allocate(),
            name: name.to_string(),
            stream_type: stream_type.to_string(),
            device_id,
            created_at: now(),
        };
        tables.streams.rows.insert(stream.id, stream.clone());
        Ok(stream)
    }

    async fn read_stream_by_id(&self, id: i64) -> Result<Stream, DbError> {
        self.tables
            .read()
            .streams
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::StreamNotFound(id.to_string()))
    }

    async fn read_streams_by_device(&self, device_id: i64) -> Result<Vec<Stream>, DbError> {
        Ok(self
            .tables
            .read()
            .streams
            .rows
            .values()
            .filter(|s| s.device_id == device_id)
            .cloned()
            .collect())
    }

    async fn read_stream_by_device_and_name(
        &self,
        device_id: i64,
        name: &str,
    ) -> Result<Stream, DbError> {
        self.tables
            .read()
            .streams
            .rows
            .values()
            .find(|s| s.device_id == device_id && s.name == name)
            .cloned()
            .ok_or_else(|| DbError::StreamNotFound(name.to_string()))
    }

    async fn update_stream(&self, device_id: i64, stream: &Stream) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        if !tables.stream_owned(stream.id, device_id) {
            return Err(DbError::StreamNotFound(stream.id.to_string()));
        }
        if tables.stream_conflict(stream.id, device_id, &stream.name) {
            return Err(DbError::StreamExists(stream.name.clone()));
        }
        if let Some(row) = tables.streams.rows.get_mut(&stream.id) {
            row.name = stream.name.clone();
            row.stream_type = stream.stream_type.clone();
        }
        Ok(())
    }

    async fn delete_stream(&self, device_id: i64, id: i64) -> Result<(), DbError> {
        let mut tables = self.tables.write();
        if !tables.stream_owned(id, device_id) {
            return Err(DbError::StreamNotFound(id.to_string()));
        }
        tables.streams.rows.remove(&id);
        Ok(())
    }
}
