//! streamgate - permission-checked access to users, devices and streams.
//!
//! Every call a caller makes goes through an [`Operator`], which binds the
//! caller's identity (a device, or the administrator) to a [`Storage`]
//! handle and checks the caller's relation to each target before touching
//! storage.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod operator;
pub mod storage;
pub mod telemetry;

pub use auth::{Actor, Operation, PermissionLevel};
pub use db::{Database, DbError};
pub use error::{OperatorError, OperatorResult, PathError};
pub use model::{Device, DeviceFlags, PhoneCarrier, Stream, User};
pub use operator::{Operator, RequestEnv, ResolvedPath};
pub use storage::{MemoryStorage, Storage};
