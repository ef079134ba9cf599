//! Operator authorization: who may do what, and what reaches storage.

mod common;

use common::World;
use std::sync::Arc;
use streamgate::db::DbError;
use streamgate::error::OperatorError;
use streamgate::model::DeviceFlags;
use streamgate::operator::Operator;
use streamgate::storage::Storage;

fn assert_denied<T: std::fmt::Debug>(result: Result<T, OperatorError>) {
    match result {
        Err(OperatorError::PermissionDenied) => {}
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
}

fn assert_invalid<T: std::fmt::Debug>(result: Result<T, OperatorError>) {
    match result {
        Err(OperatorError::InvalidParameter(_)) => {}
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

// ============================================================================
// Administrator
// ============================================================================

#[tokio::test]
async fn admin_passes_every_check() {
    let w = World::new().await;
    let admin = w.admin();

    let carol = admin
        .create_user("carol", "carol@example.com", "pw")
        .await
        .unwrap();
    let dev = admin.create_device("watch", &carol).await.unwrap();
    let stream = admin.create_stream("pulse", "int", &w.bob_phone).await.unwrap();

    admin.update_device(&w.bob_phone).await.unwrap();
    admin.update_stream(&w.bob_phone, &stream).await.unwrap();
    admin.delete_stream(&w.bob_phone, &stream).await.unwrap();
    admin.delete_device(&dev).await.unwrap();
    assert_eq!(admin.read_devices_for_user(&w.alice).await.unwrap().len(), 3);
    assert_eq!(admin.read_all_users().await.unwrap().len(), 4);
    assert_eq!(
        admin.read_device_by_api_key(&w.phone.api_key).await.unwrap(),
        w.phone
    );
}

#[tokio::test]
async fn admin_delete_missing_user_returns_storage_error() {
    let w = World::new().await;

    let err = w.admin().delete_user(7).await.unwrap_err();

    assert!(matches!(err, OperatorError::Storage(DbError::UserNotFound(ref id)) if id == "7"));
    assert_eq!(err.error_code(), "not_found");
    assert_eq!(w.storage.calls(), vec!["delete_user(7)"]);
}

// ============================================================================
// Devices
// ============================================================================

#[tokio::test]
async fn update_foreign_device_is_denied_without_storage_access() {
    let w = World::new().await;

    assert_denied(w.as_device(&w.phone).update_device(&w.bob_phone).await);
    assert!(w.storage.calls().is_empty());
}

#[tokio::test]
async fn device_updates_itself_but_not_siblings() {
    let w = World::new().await;
    let op = w.as_device(&w.phone);

    let mut renamed = w.phone.clone();
    renamed.name = "old-phone".to_string();
    op.update_device(&renamed).await.unwrap();
    assert_eq!(
        w.storage.calls(),
        vec![format!("update_device({}, {})", w.alice.id, w.phone.id)]
    );

    assert_denied(op.update_device(&w.laptop).await);
    // Even a user proxy stays below DEVICE toward its siblings.
    assert_denied(w.as_device(&w.hub).update_device(&w.laptop).await);
}

#[tokio::test]
async fn device_cannot_grant_itself_flags() {
    let w = World::new().await;
    let op = w.as_device(&w.phone);

    let mut promoted = w.phone.clone();
    promoted.is_admin = true;
    promoted.user_proxy = true;
    op.update_device(&promoted).await.unwrap();

    let stored = w.storage.inner().read_device_by_id(w.phone.id).await.unwrap();
    assert!(!stored.is_admin);
    assert!(!stored.user_proxy);

    let fresh = Operator::for_api_key(w.storage.clone(), &w.phone.api_key)
        .await
        .unwrap();
    assert_denied(fresh.read_all_users().await);

    let flags = DeviceFlags {
        is_admin: true,
        ..w.phone.flags()
    };
    assert_denied(op.set_device_flags(w.phone.id, flags).await);
    assert_denied(w.as_device(&w.hub).set_device_flags(w.phone.id, flags).await);
}

#[tokio::test]
async fn root_sets_device_flags() {
    let w = World::new().await;
    let disabled = DeviceFlags {
        enabled: false,
        ..w.laptop.flags()
    };

    w.as_device(&w.root)
        .set_device_flags(w.laptop.id, disabled)
        .await
        .unwrap();

    assert_eq!(w.storage.calls(), vec![format!("set_device_flags({})", w.laptop.id)]);
    assert!(!w.storage.inner().read_device_by_id(w.laptop.id).await.unwrap().enabled);
}

#[tokio::test]
async fn forged_owner_cannot_delete_foreign_device() {
    let w = World::new().await;
    let mut forged = w.bob_phone.clone();
    forged.user_id = w.alice.id;

    let err = w.as_device(&w.hub).delete_device(&forged).await.unwrap_err();

    assert!(matches!(err, OperatorError::Storage(DbError::DeviceNotFound(_))));
    assert!(w.storage.inner().read_device_by_id(w.bob_phone.id).await.is_ok());
}

#[tokio::test]
async fn deleting_siblings_needs_a_user_proxy() {
    let w = World::new().await;

    assert_denied(w.as_device(&w.phone).delete_device(&w.laptop).await);
    w.as_device(&w.hub).delete_device(&w.laptop).await.unwrap();
    assert_denied(w.as_device(&w.hub).delete_device(&w.bob_phone).await);
}

#[tokio::test]
async fn device_creation_for_own_user_only() {
    let w = World::new().await;
    let op = w.as_device(&w.phone);

    let tablet = op.create_device("tablet", &w.alice).await.unwrap();
    assert_eq!(tablet.user_id, w.alice.id);
    assert_denied(op.create_device("tablet", &w.bob).await);
}

#[tokio::test]
async fn device_listing_within_family() {
    let w = World::new().await;
    let op = w.as_device(&w.laptop);

    let devices = op.read_devices_for_user(&w.alice).await.unwrap();
    let names: Vec<_> = devices.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["phone", "laptop", "hub"]);

    assert_denied(op.read_devices_for_user(&w.bob).await);
}

#[tokio::test]
async fn device_lookup_by_name_within_family() {
    let w = World::new().await;
    let op = w.as_device(&w.phone);

    let laptop = op.read_device_for_user_by_name(&w.alice, "laptop").await.unwrap();
    assert_eq!(laptop, w.laptop);
    assert!(matches!(
        op.read_device_for_user_by_name(&w.alice, "toaster").await,
        Err(OperatorError::Storage(DbError::DeviceNotFound(_)))
    ));
    assert_denied(op.read_device_for_user_by_name(&w.bob, "bob-phone").await);
    assert_invalid(op.read_device_for_user_by_name(&w.alice, "").await);
}

#[tokio::test]
async fn api_key_lookup_is_root_only() {
    let w = World::new().await;

    assert_denied(w.as_device(&w.phone).read_device_by_api_key(&w.laptop.api_key).await);
    let found = w
        .as_device(&w.root)
        .read_device_by_api_key(&w.laptop.api_key)
        .await
        .unwrap();
    assert_eq!(found.id, w.laptop.id);
}

// ============================================================================
// Streams
// ============================================================================

#[tokio::test]
async fn device_creates_its_own_stream() {
    let w = World::new().await;

    let stream = w
        .as_device(&w.phone)
        .create_stream("temp", "float", &w.phone)
        .await
        .unwrap();

    assert_eq!(stream.name, "temp");
    assert_eq!(stream.stream_type, "float");
    assert_eq!(stream.device_id, w.phone.id);
    assert_eq!(
        w.storage.calls(),
        vec![format!("create_stream(temp, float, {})", w.phone.id)]
    );
}

#[tokio::test]
async fn stream_mutation_follows_owning_device() {
    let w = World::new().await;
    let stream = w
        .storage
        .inner()
        .create_stream("steps", "int", w.phone.id)
        .await
        .unwrap();

    // FAMILY is enough to read a sibling's streams, not to change them.
    let laptop = w.as_device(&w.laptop);
    assert_eq!(laptop.read_streams_by_device(&w.phone).await.unwrap().len(), 1);
    assert_denied(laptop.delete_stream(&w.phone, &stream).await);

    assert_denied(w.as_device(&w.bob_phone).read_streams_by_device(&w.phone).await);
    assert_denied(w.as_device(&w.bob_phone).update_stream(&w.phone, &stream).await);

    let mut retyped = stream.clone();
    retyped.stream_type = "float".to_string();
    w.as_device(&w.hub).update_stream(&w.phone, &retyped).await.unwrap();
    w.as_device(&w.phone).delete_stream(&w.phone, &stream).await.unwrap();
}

#[tokio::test]
async fn stream_lookup_by_name_within_family() {
    let w = World::new().await;
    let steps = w
        .storage
        .inner()
        .create_stream("steps", "int", w.phone.id)
        .await
        .unwrap();

    let found = w
        .as_device(&w.laptop)
        .read_stream_by_name(&w.phone, "steps")
        .await
        .unwrap();
    assert_eq!(found, steps);
    assert_denied(w.as_device(&w.bob_phone).read_stream_by_name(&w.phone, "steps").await);
}

#[tokio::test]
async fn forged_stream_owner_cannot_reach_foreign_stream() {
    let w = World::new().await;
    let steps = w
        .storage
        .inner()
        .create_stream("steps", "int", w.bob_phone.id)
        .await
        .unwrap();
    let mut forged = steps.clone();
    forged.device_id = w.phone.id;
    let op = w.as_device(&w.phone);

    assert!(matches!(
        op.delete_stream(&w.phone, &forged).await,
        Err(OperatorError::Storage(DbError::StreamNotFound(_)))
    ));
    forged.name = "hijacked".to_string();
    assert!(matches!(
        op.update_stream(&w.phone, &forged).await,
        Err(OperatorError::Storage(DbError::StreamNotFound(_)))
    ));

    assert_eq!(w.storage.inner().read_stream_by_id(steps.id).await.unwrap(), steps);
}

#[tokio::test]
async fn stream_paired_with_wrong_device_is_rejected() {
    let w = World::new().await;
    let stream = w
        .storage
        .inner()
        .create_stream("steps", "int", w.bob_phone.id)
        .await
        .unwrap();

    // The caller owns `phone`, but the stream belongs to bob.
    assert_invalid(w.as_device(&w.phone).delete_stream(&w.phone, &stream).await);
    assert!(w.storage.calls().is_empty());
}

// ============================================================================
// Users and carriers
// ============================================================================

#[tokio::test]
async fn user_operations_need_root() {
    let w = World::new().await;
    let op = w.as_device(&w.phone);

    assert_denied(op.create_user("carol", "carol@example.com", "pw").await);
    assert_denied(op.read_user("alice").await);
    assert_denied(op.read_user_by_id(w.alice.id).await);
    assert_denied(op.read_user_by_email("alice@example.com").await);
    assert_denied(op.read_all_users().await);
    assert_denied(op.update_user(&w.alice).await);
    assert_denied(op.delete_user(w.bob.id).await);
    assert!(w.storage.calls().is_empty());

    let root = w.as_device(&w.root);
    let by_email = root.read_user_by_email("ALICE@example.com").await.unwrap();
    assert_eq!(by_email.id, w.alice.id);
    root.delete_user(w.bob.id).await.unwrap();
    assert!(matches!(
        root.read_user("bob").await,
        Err(OperatorError::Storage(DbError::UserNotFound(_)))
    ));
}

#[tokio::test]
async fn carriers_readable_by_enabled_devices() {
    let w = World::new().await;
    let carrier = w
        .as_device(&w.root)
        .create_phone_carrier("Verizon", "vtext.com")
        .await
        .unwrap();

    let op = w.as_device(&w.phone);
    assert_eq!(op.read_phone_carrier_by_id(carrier.id).await.unwrap(), carrier);
    assert_eq!(op.read_all_phone_carriers().await.unwrap().len(), 1);
    assert_denied(op.create_phone_carrier("Sprint", "sprint.com").await);
    assert_denied(op.update_phone_carrier(&carrier).await);
    assert_denied(op.delete_phone_carrier(carrier.id).await);

    let mut disabled = w.phone.clone();
    disabled.enabled = false;
    assert_denied(w.as_device(&disabled).read_all_phone_carriers().await);
}

// ============================================================================
// Argument validation
// ============================================================================

#[tokio::test]
async fn malformed_arguments_fail_before_permission_checks() {
    let w = World::new().await;
    // bob's device could not touch alice's phone anyway; validation wins.
    let op = w.as_device(&w.bob_phone);

    assert_invalid(op.create_stream("", "float", &w.phone).await);
    assert_invalid(op.create_stream("temp", "", &w.phone).await);
    assert_invalid(op.create_device("", &w.alice).await);
    assert_invalid(op.create_user("", "x@example.com", "pw").await);
    assert_invalid(op.delete_user(0).await);
    assert_invalid(op.create_phone_carrier("Sprint", "").await);

    let mut unsaved = w.phone.clone();
    unsaved.id = 0;
    assert_invalid(op.update_device(&unsaved).await);

    assert!(w.storage.calls().is_empty());
}

// ============================================================================
// Operator construction and snapshots
// ============================================================================

#[tokio::test]
async fn unknown_api_key_fails_construction() {
    let w = World::new().await;

    let err = Operator::for_api_key(w.storage.clone(), "no-such-key")
        .await
        .unwrap_err();
    assert!(matches!(err, OperatorError::Storage(DbError::DeviceNotFound(_))));

    let op = Operator::for_api_key(w.storage.clone(), &w.phone.api_key)
        .await
        .unwrap();
    assert_eq!(op.device(), Some(&w.phone));
    assert!(Operator::admin(w.storage.clone()).device().is_none());
}

#[tokio::test]
async fn operator_keeps_its_device_snapshot() {
    let w = World::new().await;
    let op = Operator::for_api_key(w.storage.clone(), &w.phone.api_key)
        .await
        .unwrap();

    let mut disabled = w.phone.clone();
    disabled.enabled = false;
    w.storage
        .inner()
        .set_device_flags(disabled.id, disabled.flags())
        .await
        .unwrap();

    // The existing Operator still acts on the enabled snapshot.
    op.read_all_phone_carriers().await.unwrap();

    let fresh = Operator::for_api_key(w.storage.clone(), &w.phone.api_key)
        .await
        .unwrap();
    assert_denied(fresh.read_all_phone_carriers().await);
}

#[tokio::test]
async fn disabled_device_acts_only_on_itself() {
    let w = World::new().await;
    let mut disabled = w.phone.clone();
    disabled.enabled = false;
    let op = w.as_device(&disabled);

    assert_denied(op.create_device("escape", &w.alice).await);
    assert_denied(op.read_devices_for_user(&w.alice).await);
    assert_denied(op.read_streams_by_device(&w.laptop).await);
    assert!(w.storage.calls().is_empty());

    let mut renamed = disabled.clone();
    renamed.name = "old-phone".to_string();
    op.update_device(&renamed).await.unwrap();
    op.read_streams_by_device(&disabled).await.unwrap();
}

#[tokio::test]
async fn operators_are_usable_concurrently() {
    let w = World::new().await;
    let op = Arc::new(w.as_device(&w.phone));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let op = Arc::clone(&op);
            let phone = w.phone.clone();
            tokio::spawn(async move { op.create_stream(&format!("s{i}"), "int", &phone).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let streams = w.storage.inner().read_streams_by_device(w.phone.id).await.unwrap();
    assert_eq!(streams.len(), 16);
}
