//! A small population of users and devices.

use super::RecordingStorage;
use std::sync::Arc;
use streamgate::auth::Actor;
use streamgate::model::{Device, User};
use streamgate::operator::Operator;
use streamgate::storage::Storage;

/// Users `alice` and `bob`, plus an `ops` account with a ROOT device.
///
/// alice owns `phone`, `laptop` and `hub` (a user proxy); bob owns
/// `bob-phone`. The call log is empty once construction finishes.
#[allow(dead_code)]
pub struct World {
    pub storage: Arc<RecordingStorage>,
    pub alice: User,
    pub bob: User,
    pub ops: User,
    pub phone: Device,
    pub laptop: Device,
    pub hub: Device,
    pub bob_phone: Device,
    pub root: Device,
}

#[allow(dead_code)]
impl World {
    pub async fn new() -> Self {
        let storage = Arc::new(RecordingStorage::new());
        let store = storage.inner();

        let alice = store
            .create_user("alice", "alice@example.com", "alice-pw")
            .await
            .unwrap();
        let bob = store.create_user("bob", "bob@example.com", "bob-pw").await.unwrap();
        let ops = store.create_user("ops", "ops@example.com", "ops-pw").await.unwrap();

        let phone = store.create_device("phone", alice.id).await.unwrap();
        let laptop = store.create_device("laptop", alice.id).await.unwrap();
        let mut hub = store.create_device("hub", alice.id).await.unwrap();
        hub.user_proxy = true;
        store.set_device_flags(hub.id, hub.flags()).await.unwrap();

        let bob_phone = store.create_device("bob-phone", bob.id).await.unwrap();

        let mut root = store.create_device("console", ops.id).await.unwrap();
        root.is_admin = true;
        store.set_device_flags(root.id, root.flags()).await.unwrap();

        storage.clear();

        Self {
            storage,
            alice,
            bob,
            ops,
            phone,
            laptop,
            hub,
            bob_phone,
            root,
        }
    }

    /// Operator acting as a snapshot of `device`.
    pub fn as_device(&self, device: &Device) -> Operator {
        Operator::new(self.storage.clone(), Actor::Device(device.clone()))
    }

    pub fn admin(&self) -> Operator {
        Operator::admin(self.storage.clone())
    }
}
