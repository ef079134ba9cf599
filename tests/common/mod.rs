//! Integration test common infrastructure.
//!
//! Provides a call-recording storage wrapper and a small fixture world of
//! users and devices.

pub mod fixtures;
pub mod recording;

#[allow(unused_imports)]
pub use fixtures::World;
#[allow(unused_imports)]
pub use recording::RecordingStorage;
