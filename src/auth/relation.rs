//! Relation computation: how privileged an actor is toward a target.
//!
//! Every function here is a pure function of the actor's device snapshot and
//! the target record. No storage access happens while computing a relation.

use super::PermissionLevel;
use crate::model::{Device, Stream, User};
use std::fmt;

/// The identity an [`Operator`](crate::operator::Operator) acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// System-internal identity. Holds [`PermissionLevel::MAX`] toward everything.
    Administrator,
    /// A device, captured as a point-in-time snapshot of its record.
    Device(Device),
}

impl Actor {
    /// The acting device, if any.
    pub fn device(&self) -> Option<&Device> {
        match self {
            Actor::Administrator => None,
            Actor::Device(dev) => Some(dev),
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, Actor::Administrator)
    }

    /// Baseline level derived from the device's own flags, independent of
    /// any target.
    pub fn general_permissions(&self) -> PermissionLevel {
        match self {
            Actor::Administrator => PermissionLevel::MAX,
            Actor::Device(dev) => device_baseline(dev),
        }
    }

    /// Level toward a user account.
    ///
    /// The owning user's enabled devices act at USER level toward it.
    pub fn relation_to_user(&self, user: &User) -> PermissionLevel {
        match self {
            Actor::Administrator => PermissionLevel::MAX,
            Actor::Device(dev) => {
                let closer = if dev.enabled && dev.is_owned_by(user) {
                    PermissionLevel::User
                } else {
                    PermissionLevel::Nobody
                };
                closer.max(device_baseline(dev))
            }
        }
    }

    /// Level toward a device: DEVICE for itself, FAMILY (USER for user
    /// proxies) for devices of the same owner. A disabled device keeps only
    /// the self relation.
    pub fn relation_to_device(&self, target: &Device) -> PermissionLevel {
        match self {
            Actor::Administrator => PermissionLevel::MAX,
            Actor::Device(dev) => {
                let closer = if dev.id == target.id {
                    PermissionLevel::Device
                } else if dev.enabled && dev.user_id == target.user_id {
                    if dev.user_proxy {
                        PermissionLevel::User
                    } else {
                        PermissionLevel::Family
                    }
                } else {
                    PermissionLevel::Nobody
                };
                closer.max(device_baseline(dev))
            }
        }
    }

    /// Level toward a stream, governed by the relation to its owning device.
    ///
    /// A stream paired with a device that does not own it gets no closer
    /// relation than the baseline.
    pub fn relation_to_stream(&self, stream: &Stream, owner: &Device) -> PermissionLevel {
        if stream.is_owned_by(owner) {
            self.relation_to_device(owner)
        } else {
            self.general_permissions()
        }
    }
}

fn device_baseline(dev: &Device) -> PermissionLevel {
    if !dev.enabled {
        PermissionLevel::Nobody
    } else if dev.is_admin {
        PermissionLevel::Root
    } else {
        PermissionLevel::Enabled
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Administrator => f.write_str("administrator"),
            Actor::Device(dev) => write!(f, "device:{}({})", dev.id, dev.name),
        }
    }
}
