//! Records for the three nested resource kinds and the global phone carriers.
//!
//! Users own Devices, Devices own Streams. Ownership is expressed by the
//! foreign id fields (`Device::user_id`, `Stream::device_id`); nothing here
//! holds references to other records.

/// An account on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,
    pub created_at: i64,
}

/// A device owned by a user. Every caller of the platform acts as a device,
/// identified by its API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub api_key: String,
    /// Id of the owning user.
    pub user_id: i64,
    /// Disabled devices hold no baseline permissions and act only on themselves.
    pub enabled: bool,
    /// Grants ROOT as baseline permission level.
    pub is_admin: bool,
    /// Acts with the owning user's authority toward sibling devices.
    pub user_proxy: bool,
    pub created_at: i64,
}

/// The capability flags of a device. Only ROOT callers may change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFlags {
    pub enabled: bool,
    pub is_admin: bool,
    pub user_proxy: bool,
}

impl Default for DeviceFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            is_admin: false,
            user_proxy: false,
        }
    }
}

/// A named, typed series of data produced by a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    pub id: i64,
    pub name: String,
    pub stream_type: String,
    /// Id of the owning device.
    pub device_id: i64,
    pub created_at: i64,
}

/// Carrier used to route SMS-style notifications through an email gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneCarrier {
    pub id: i64,
    pub name: String,
    pub email_domain: String,
}

impl Device {
    pub fn flags(&self) -> DeviceFlags {
        DeviceFlags {
            enabled: self.enabled,
            is_admin: self.is_admin,
            user_proxy: self.user_proxy,
        }
    }

    /// Whether this device belongs to `user`.
    #[inline]
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}

impl Stream {
    /// Whether this stream belongs to `device`.
    #[inline]
    pub fn is_owned_by(&self, device: &Device) -> bool {
        self.device_id == device.id
    }
}
