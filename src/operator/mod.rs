//! The permission-checked proxy between callers and storage.
//!
//! An [`Operator`] binds a storage handle to an [`Actor`]. Every public
//! operation follows the same sequence:
//!
//! 1. Validate arguments (`InvalidParameter`), before anything else.
//! 2. Compute the actor's relation to the target and compare it with the
//!    operation's required level from [`Operation`] (`PermissionDenied`).
//! 3. Delegate once to [`Storage`] and return its result unchanged.
//!
//! A rejected call never touches storage.
//!
//! # Snapshot semantics
//!
//! The actor's device is captured when the Operator is built and is never
//! re-read. Relations are recomputed on every call, but always from that
//! snapshot. After the device record changes (disabled, flags revoked, ...)
//! the caller must build a new Operator; keep Operators request-scoped.

mod carriers;
mod devices;
mod path;
mod streams;
mod users;

pub use path::{RequestEnv, ResolvedPath};

use crate::auth::{Actor, Basis, Operation, PermissionLevel};
use crate::error::{OperatorError, OperatorResult};
use crate::model::{Device, Stream, User};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, trace};

/// The record an authorization decision is made against.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    /// No ownership relation; the actor's baseline applies.
    General,
    User(&'a User),
    Device(&'a Device),
    Stream(&'a Stream, &'a Device),
}

impl Target<'_> {
    fn basis(&self) -> Basis {
        match self {
            Target::General => Basis::General,
            Target::User(_) => Basis::User,
            Target::Device(_) => Basis::Device,
            Target::Stream(..) => Basis::Stream,
        }
    }
}

/// A caller identity bound to a storage handle.
#[derive(Clone)]
pub struct Operator {
    storage: Arc<dyn Storage>,
    actor: Actor,
}

impl Operator {
    pub fn new(storage: Arc<dyn Storage>, actor: Actor) -> Self {
        Self { storage, actor }
    }

    /// An Operator with unconditional access, for system-internal flows.
    pub fn admin(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, Actor::Administrator)
    }

    /// An Operator acting as the device owning `api_key`.
    ///
    /// Fails with the storage error when the key is unknown.
    pub async fn for_api_key(storage: Arc<dyn Storage>, api_key: &str) -> OperatorResult<Self> {
        if api_key.is_empty() {
            return Err(OperatorError::InvalidParameter("api key"));
        }
        let device = storage.read_device_by_api_key(api_key).await.map_err(|e| {
            debug!(error = %e, "API key did not resolve to a device");
            OperatorError::from(e)
        })?;
        Ok(Self::new(storage, Actor::Device(device)))
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The acting device snapshot; `None` for the administrator.
    pub fn device(&self) -> Option<&Device> {
        self.actor.device()
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Level the actor holds toward `target`.
    fn level(&self, target: Target<'_>) -> PermissionLevel {
        match target {
            Target::General => self.actor.general_permissions(),
            Target::User(user) => self.actor.relation_to_user(user),
            Target::Device(device) => self.actor.relation_to_device(device),
            Target::Stream(stream, device) => self.actor.relation_to_stream(stream, device),
        }
    }

    /// Check the actor may perform `op` on `target`.
    fn authorize(&self, op: Operation, target: Target<'_>) -> OperatorResult<()> {
        debug_assert_eq!(op.basis(), target.basis(), "{op} checked against wrong relation");

        let level = self.level(target);
        let required = op.required();
        if level.gte(required) {
            trace!(operation = %op, actor = %self.actor, %level, "Operation granted");
            Ok(())
        } else {
            debug!(
                operation = %op,
                actor = %self.actor,
                %level,
                %required,
                "Operation denied"
            );
            Err(OperatorError::PermissionDenied)
        }
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator").field("actor", &self.actor).finish_non_exhaustive()
    }
}

fn require_non_empty(value: &str, what: &'static str) -> OperatorResult<()> {
    if value.is_empty() {
        Err(OperatorError::InvalidParameter(what))
    } else {
        Ok(())
    }
}

fn require_id(id: i64, what: &'static str) -> OperatorResult<()> {
    if id > 0 {
        Ok(())
    } else {
        Err(OperatorError::InvalidParameter(what))
    }
}
