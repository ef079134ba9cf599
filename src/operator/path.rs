//! Hierarchical addressing: `user/device/stream`.
//!
//! Paths always have three `/`-separated segments. Empty segments fill in
//! from the actor: an empty user is the acting device's owner, an empty
//! device is the acting device itself (when it belongs to the resolved
//! user), and an empty stream is simply not resolved. So a device can
//! address its own stream as `//temperature`, a sibling's as
//! `/kitchen/temperature`, and a root caller anything as
//! `alice/kitchen/temperature`.
//!
//! Every lookup goes through the same relation checks as the direct
//! Operator reads.

use super::{Operator, Target};
use crate::auth::Operation;
use crate::error::{OperatorError, OperatorResult, PathError};
use crate::model::{Device, Stream, User};
use crate::telemetry::spans;
use tracing::Instrument;

/// Entities named by a path. Unresolved segments are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPath {
    pub user: Option<User>,
    pub device: Option<Device>,
    pub stream: Option<Stream>,
}

/// Split a path into its three segments.
fn split_path(path: &str) -> OperatorResult<[&str; 3]> {
    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(user), Some(device), Some(stream), None) => Ok([user, device, stream]),
        _ => Err(OperatorError::InvalidPath(path.to_string())),
    }
}

impl Operator {
    /// Resolve `user/device/stream` as this Operator's actor.
    ///
    /// On failure the returned [`PathError`] carries whatever was resolved
    /// before the failing stage.
    pub async fn resolve_path(&self, path: &str) -> Result<ResolvedPath, PathError> {
        self.resolve_segments(path)
            .instrument(spans::resolve(&self.actor, path))
            .await
    }

    /// Resolve `path` and bundle the result with this Operator.
    pub async fn request_env(&self, path: &str) -> Result<RequestEnv<'_>, PathError> {
        let resolved = self.resolve_path(path).await?;
        Ok(RequestEnv {
            operator: self,
            resolved,
        })
    }

    async fn resolve_segments(&self, path: &str) -> Result<ResolvedPath, PathError> {
        let mut resolved = ResolvedPath::default();

        let [user_name, device_name, stream_name] = match split_path(path) {
            Ok(segments) => segments,
            Err(e) => return Err(PathError::new(resolved, e)),
        };

        let user = match self.resolve_user(user_name).await {
            Ok(user) => user,
            Err(e) => return Err(PathError::new(resolved, e)),
        };

        let device = if device_name.is_empty() {
            self.device().filter(|dev| dev.is_owned_by(&user)).cloned()
        } else {
            match self.read_device_for_user_by_name(&user, device_name).await {
                Ok(device) => Some(device),
                Err(e) => {
                    resolved.user = Some(user);
                    return Err(PathError::new(resolved, e));
                }
            }
        };
        resolved.user = Some(user);
        resolved.device = device;

        if stream_name.is_empty() {
            return Ok(resolved);
        }

        let stream = match &resolved.device {
            Some(device) => self.read_stream_by_name(device, stream_name).await,
            None => Err(OperatorError::InvalidPath(format!(
                "{path}: stream segment needs a device"
            ))),
        };
        match stream {
            Ok(stream) => {
                resolved.stream = Some(stream);
                Ok(resolved)
            }
            Err(e) => Err(PathError::new(resolved, e)),
        }
    }

    /// Resolve the user segment and check the actor may see that user.
    async fn resolve_user(&self, name: &str) -> OperatorResult<User> {
        let user = if name.is_empty() {
            let Some(device) = self.device() else {
                return Err(OperatorError::InvalidPath(
                    "administrator paths need an explicit user".to_string(),
                ));
            };
            self.storage.read_user_by_id(device.user_id).await?
        } else {
            match self.storage.read_user_by_name(name).await {
                Ok(user) => user,
                // A caller that could not see arbitrary users must not learn
                // which names exist.
                Err(e)
                    if e.is_not_found()
                        && !self
                            .actor
                            .general_permissions()
                            .gte(Operation::ResolveUser.required()) =>
                {
                    return Err(OperatorError::PermissionDenied);
                }
                Err(e) => return Err(e.into()),
            }
        };

        self.authorize(Operation::ResolveUser, Target::User(&user))?;
        Ok(user)
    }
}

/// An Operator together with the entities a request path resolved to.
#[derive(Debug)]
pub struct RequestEnv<'a> {
    operator: &'a Operator,
    resolved: ResolvedPath,
}

impl<'a> RequestEnv<'a> {
    pub fn operator(&self) -> &'a Operator {
        self.operator
    }

    pub fn user(&self) -> Option<&User> {
        self.resolved.user.as_ref()
    }

    pub fn device(&self) -> Option<&Device> {
        self.resolved.device.as_ref()
    }

    pub fn stream(&self) -> Option<&Stream> {
        self.resolved.stream.as_ref()
    }

    pub fn into_resolved(self) -> ResolvedPath {
        self.resolved
    }

    /// Streams of the resolved device.
    pub async fn streams(&self) -> OperatorResult<Vec<Stream>> {
        let device = self
            .device()
            .ok_or(OperatorError::InvalidParameter("path names no device"))?;
        self.operator.read_streams_by_device(device).await
    }
}
