//! The authorization table: which level each operation requires, and which
//! relation computes the caller's actual level.

use super::PermissionLevel;
use std::fmt;

/// Which relation function supplies the caller's level for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// [`Actor::general_permissions`](super::Actor::general_permissions)
    General,
    /// [`Actor::relation_to_user`](super::Actor::relation_to_user)
    User,
    /// [`Actor::relation_to_device`](super::Actor::relation_to_device)
    Device,
    /// [`Actor::relation_to_stream`](super::Actor::relation_to_stream)
    Stream,
}

/// Every permission-checked operation of the Operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateUser,
    ReadUser,
    ReadAllUsers,
    UpdateUser,
    DeleteUser,

    CreatePhoneCarrier,
    ReadPhoneCarrier,
    ReadAllPhoneCarriers,
    UpdatePhoneCarrier,
    DeletePhoneCarrier,

    CreateDevice,
    ReadDevicesForUser,
    ReadDeviceForUserByName,
    ReadDeviceByApiKey,
    /// Resolving the user segment of a path.
    ResolveUser,
    UpdateDevice,
    SetDeviceFlags,
    DeleteDevice,

    CreateStream,
    ReadStreamsByDevice,
    ReadStreamByName,
    UpdateStream,
    DeleteStream,
}

impl Operation {
    pub const ALL: [Operation; 23] = [
        Operation::CreateUser,
        Operation::ReadUser,
        Operation::ReadAllUsers,
        Operation::UpdateUser,
        Operation::DeleteUser,
        Operation::CreatePhoneCarrier,
        Operation::ReadPhoneCarrier,
        Operation::ReadAllPhoneCarriers,
        Operation::UpdatePhoneCarrier,
        Operation::DeletePhoneCarrier,
        Operation::CreateDevice,
        Operation::ReadDevicesForUser,
        Operation::ReadDeviceForUserByName,
        Operation::ReadDeviceByApiKey,
        Operation::ResolveUser,
        Operation::UpdateDevice,
        Operation::SetDeviceFlags,
        Operation::DeleteDevice,
        Operation::CreateStream,
        Operation::ReadStreamsByDevice,
        Operation::ReadStreamByName,
        Operation::UpdateStream,
        Operation::DeleteStream,
    ];

    /// Minimum level the caller must hold.
    pub fn required(self) -> PermissionLevel {
        use Operation::*;
        match self {
            CreateUser | ReadUser | ReadAllUsers | UpdateUser | DeleteUser => PermissionLevel::Root,
            CreatePhoneCarrier | UpdatePhoneCarrier | DeletePhoneCarrier => PermissionLevel::Root,
            ReadDeviceByApiKey | SetDeviceFlags => PermissionLevel::Root,
            ReadPhoneCarrier | ReadAllPhoneCarriers => PermissionLevel::Enabled,
            CreateDevice => PermissionLevel::User,
            ReadDevicesForUser | ReadDeviceForUserByName | ResolveUser => PermissionLevel::Family,
            UpdateDevice => PermissionLevel::Device,
            DeleteDevice => PermissionLevel::User,
            CreateStream => PermissionLevel::User,
            ReadStreamsByDevice | ReadStreamByName => PermissionLevel::Family,
            UpdateStream | DeleteStream => PermissionLevel::User,
        }
    }

    /// Relation that computes the caller's level for this operation.
    pub fn basis(self) -> Basis {
        use Operation::*;
        match self {
            CreateUser | ReadUser | ReadAllUsers | UpdateUser | DeleteUser => Basis::General,
            CreatePhoneCarrier | ReadPhoneCarrier | ReadAllPhoneCarriers => Basis::General,
            UpdatePhoneCarrier | DeletePhoneCarrier | ReadDeviceByApiKey => Basis::General,
            SetDeviceFlags => Basis::General,
            CreateDevice | ReadDevicesForUser | ReadDeviceForUserByName | ResolveUser => Basis::User,
            UpdateDevice | DeleteDevice => Basis::Device,
            CreateStream | ReadStreamsByDevice | ReadStreamByName => Basis::Device,
            UpdateStream | DeleteStream => Basis::Stream,
        }
    }

    pub fn as_str(self) -> &'static str {
        use Operation::*;
        match self {
            CreateUser => "create_user",
            ReadUser => "read_user",
            ReadAllUsers => "read_all_users",
            UpdateUser => "update_user",
            DeleteUser => "delete_user",
            CreatePhoneCarrier => "create_phone_carrier",
            ReadPhoneCarrier => "read_phone_carrier",
            ReadAllPhoneCarriers => "read_all_phone_carriers",
            UpdatePhoneCarrier => "update_phone_carrier",
            DeletePhoneCarrier => "delete_phone_carrier",
            CreateDevice => "create_device",
            ReadDevicesForUser => "read_devices_for_user",
            ReadDeviceForUserByName => "read_device_for_user_by_name",
            ReadDeviceByApiKey => "read_device_by_api_key",
            ResolveUser => "resolve_user",
            UpdateDevice => "update_device",
            SetDeviceFlags => "set_device_flags",
            DeleteDevice => "delete_device",
            CreateStream => "create_stream",
            ReadStreamsByDevice => "read_streams_by_device",
            ReadStreamByName => "read_stream_by_name",
            UpdateStream => "update_stream",
            DeleteStream => "delete_stream",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
