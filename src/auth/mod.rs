//! Trust model: permission levels, actor relations and the operation table.

mod permission;
mod policy;
mod relation;

pub use permission::{PermissionLevel, UnknownLevel};
pub use policy::{Basis, Operation};
pub use relation::Actor;
