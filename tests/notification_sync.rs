mod common;

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use common::{notification, settle, FakeNotifications};
use quickhands_sync::auth::{AuthHandle, StaticToken, TokenSource};
use quickhands_sync::notifications::NotificationSync;
use quickhands_sync::sync::{MutationOutcome, MutationStrategy, RefreshOutcome, SyncScope};

const PERIOD: Duration = Duration::from_secs(10);

fn signed_in() -> AuthHandle {
    AuthHandle::signed_in("user_1", StaticToken::new("test-token"))
}

fn sync_with(api: &Arc<FakeNotifications>, auth: AuthHandle) -> (NotificationSync, SyncScope) {
    let scope = SyncScope::new();
    let sync = NotificationSync::new(api.clone(), auth, &scope, PERIOD);
    (sync, scope)
}

fn ids(sync: &NotificationSync) -> Vec<(i64, bool)> {
    sync.notifications().iter().map(|n| (n.id, n.read)).collect()
}

#[tokio::test]
async fn mark_as_read_then_refetch_restores_unread() {
    let api = Arc::new(FakeNotifications::returning(vec![
        notification(1, false),
        notification(2, false),
    ]));
    let (sync, _scope) = sync_with(&api, signed_in());

    assert!(sync.fetch_notifications().await.is_applied());
    assert_eq!(sync.unread_count(), 2);

    assert_eq!(
        sync.mark_as_read(1),
        MutationOutcome::Applied(MutationStrategy::LocalOnly)
    );
    assert_eq!(sync.unread_count(), 1);

    assert_eq!(
        sync.refresh_notifications().await,
        RefreshOutcome::Applied { count: 2 }
    );
    assert_eq!(sync.unread_count(), 2);
    assert_eq!(ids(&sync), vec![(1, false), (2, false)]);
}

#[tokio::test]
async fn unread_count_drops_by_distinct_existing_ids() {
    let api = Arc::new(FakeNotifications::returning(vec![
        notification(1, false),
        notification(2, false),
        notification(3, true),
        notification(4, false),
    ]));
    let (sync, _scope) = sync_with(&api, signed_in());
    sync.fetch_notifications().await;
    assert_eq!(sync.unread_count(), 3);

    sync.mark_as_read(1);
    sync.mark_as_read(1);
    assert_eq!(sync.mark_as_read(3), MutationOutcome::NoOp);
    assert_eq!(sync.mark_as_read(99), MutationOutcome::NoOp);
    sync.mark_as_read(4);

    assert_eq!(sync.unread_count(), 1);
    assert_eq!(api.calls(), 1);
}

#[tokio::test]
async fn mark_as_read_is_idempotent() {
    let api = Arc::new(FakeNotifications::returning(vec![
        notification(1, false),
        notification(2, false),
    ]));
    let (once, _a) = sync_with(&api, signed_in());
    let (twice, _b) = sync_with(&api, signed_in());
    once.fetch_notifications().await;
    twice.fetch_notifications().await;

    once.mark_as_read(2);
    twice.mark_as_read(2);
    assert_eq!(twice.mark_as_read(2), MutationOutcome::NoOp);

    assert_eq!(once.notifications(), twice.notifications());
}

#[tokio::test]
async fn successful_fetch_replaces_collection_exactly() {
    let api = Arc::new(FakeNotifications::returning(vec![notification(1, false)]));
    let (sync, _scope) = sync_with(&api, signed_in());
    sync.fetch_notifications().await;
    sync.mark_as_read(1);

    let server = vec![notification(2, true), notification(3, false)];
    api.push(Ok(server.clone()));
    sync.fetch_notifications().await;

    assert_eq!(sync.notifications(), server);
}

#[tokio::test]
async fn failed_fetch_keeps_local_collection() {
    let api = Arc::new(FakeNotifications::returning(vec![
        notification(1, false),
        notification(2, false),
    ]));
    let (sync, _scope) = sync_with(&api, signed_in());
    sync.fetch_notifications().await;
    sync.mark_as_read(2);
    let before = sync.notifications();

    api.push(Err("Internal Server Error".to_string()));
    let outcome = sync.fetch_notifications().await;

    assert!(matches!(outcome, RefreshOutcome::Failed { .. }));
    assert_eq!(sync.notifications(), before);
}

#[tokio::test]
async fn missing_identity_skips_without_request() {
    let api = Arc::new(FakeNotifications::returning(vec![notification(1, false)]));

    let (anonymous, _a) = sync_with(&api, AuthHandle::new());
    assert_eq!(anonymous.fetch_notifications().await, RefreshOutcome::Skipped);

    let pending = AuthHandle::new();
    pending.set_user_id(Some("user_1"));
    let (pending_sync, _b) = sync_with(&api, pending);
    assert_eq!(pending_sync.fetch_notifications().await, RefreshOutcome::Skipped);

    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn clear_notifications_empties_collection() {
    let api = Arc::new(FakeNotifications::returning(vec![
        notification(1, false),
        notification(2, false),
    ]));
    let (sync, _scope) = sync_with(&api, signed_in());
    sync.fetch_notifications().await;

    sync.clear_notifications();
    assert!(sync.notifications().is_empty());
    assert_eq!(sync.unread_count(), 0);
}

#[tokio::test]
async fn older_response_arriving_last_is_not_applied() {
    let api = Arc::new(FakeNotifications::returning(Vec::new()));
    let (sync, _scope) = sync_with(&api, signed_in());

    let release_first = api.push_gated(Ok(vec![notification(1, false)]));
    api.push(Ok(vec![notification(1, true), notification(2, false)]));

    let slow = sync.clone();
    let first = tokio::spawn(async move { slow.fetch_notifications().await });
    settle().await;

    assert_eq!(
        sync.fetch_notifications().await,
        RefreshOutcome::Applied { count: 2 }
    );

    release_first.send(()).unwrap();
    assert_eq!(first.await.unwrap(), RefreshOutcome::Stale);
    assert_eq!(ids(&sync), vec![(1, true), (2, false)]);
}

#[tokio::test]
async fn response_after_scope_close_is_discarded() {
    let api = Arc::new(FakeNotifications::returning(Vec::new()));
    let (sync, scope) = sync_with(&api, signed_in());

    let release = api.push_gated(Ok(vec![notification(1, false)]));
    let pending = sync.clone();
    let fetch = tokio::spawn(async move { pending.fetch_notifications().await });
    settle().await;

    scope.close();
    release.send(()).unwrap();

    assert_eq!(fetch.await.unwrap(), RefreshOutcome::Discarded);
    assert!(sync.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn polling_waits_for_identity_then_fires_on_next_tick() {
    let api = Arc::new(FakeNotifications::returning(vec![notification(1, false)]));
    let auth = AuthHandle::new();
    let (sync, _scope) = sync_with(&api, auth.clone());

    let _poller = sync.start_polling();
    settle().await;
    sleep(Duration::from_secs(25)).await;
    settle().await;
    assert_eq!(api.calls(), 0);

    auth.set_user_id(Some("user_1"));
    auth.set_token_source(TokenSource::ready(StaticToken::new("test-token")));
    settle().await;
    assert_eq!(api.calls(), 0);

    sleep(Duration::from_secs(6)).await;
    settle().await;
    assert_eq!(api.calls(), 1);
    assert_eq!(sync.unread_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_poll_waits_for_next_fixed_tick() {
    let api = Arc::new(FakeNotifications::returning(vec![notification(1, false)]));
    api.set_fallback(Err("Service Unavailable".to_string()));
    let (sync, _scope) = sync_with(&api, signed_in());

    let _poller = sync.start_polling();
    settle().await;
    assert_eq!(api.calls(), 1);

    sleep(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(api.calls(), 1);

    sleep(Duration::from_secs(6)).await;
    settle().await;
    assert_eq!(api.calls(), 2);
    assert!(sync.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_poll_handle_stops_requests() {
    let api = Arc::new(FakeNotifications::returning(vec![notification(1, false)]));
    let (sync, scope) = sync_with(&api, signed_in());

    let poller = sync.start_polling();
    settle().await;
    assert_eq!(api.calls(), 1);

    drop(poller);
    sleep(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(api.calls(), 1);
    assert!(scope.is_alive());
}
