use std::sync::Arc;

use curator_core::AppError;
use curator_domain::{FilterKey, GachaItem, GachaItemBinding, ListQueryPatch};

use super::{REAUTHENTICATE_MESSAGE, ReloadOutcome};
use crate::console_ports::NotificationLevel;
use crate::test_support::{
    FakeResourceApi, RecordingNotifier, badge, badge_list, badges, list_for,
};

fn search(term: &str) -> ListQueryPatch {
    ListQueryPatch {
        search: Some(term.to_owned()),
        ..ListQueryPatch::default()
    }
}

#[tokio::test]
async fn empty_collection_shows_single_empty_page() {
    let api = Arc::new(FakeResourceApi::with_records(Vec::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 20);

    let outcome = list.reload(ListQueryPatch::default()).await;

    assert_eq!(outcome, Ok(ReloadOutcome::Applied));
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.result.total_pages(), 1);
    assert_eq!(snapshot.query.page(), 1);
    assert!(snapshot.result.is_empty());
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn later_request_wins_when_earlier_response_arrives_last() {
    let api = Arc::new(FakeResourceApi::with_records(vec![
        badge(1, "alpha", true),
        badge(2, "abyss", true),
        badge(3, "abacus", true),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 20);
    let release_first = api.hold_list("a").await;

    let first = {
        let list = list.clone();
        tokio::spawn(async move { list.reload(search("a")).await })
    };
    api.wait_for_list_calls(1).await;

    let second = list.reload(search("aby")).await;
    assert_eq!(second, Ok(ReloadOutcome::Applied));

    let _ = release_first.send(());
    let first = first.await.unwrap_or_else(|_| unreachable!());
    assert_eq!(first, Ok(ReloadOutcome::Superseded));

    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.query.search(), "aby");
    assert_eq!(snapshot.result.items().len(), 1);
    assert_eq!(snapshot.result.items()[0].name, "abyss");
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn failed_reload_keeps_previous_result_visible() {
    let api = Arc::new(FakeResourceApi::with_records(badges(3)));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 20);
    assert!(list.reload(ListQueryPatch::default()).await.is_ok());

    api.fail_lists_with(Some(AppError::Internal("database is down".to_owned())))
        .await;
    let outcome = list.reload(ListQueryPatch::page(1)).await;

    assert!(matches!(outcome, Err(AppError::Internal(_))));
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.result.items().len(), 3);
    assert!(!snapshot.is_loading);

    let notifications = notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].message, "database is down");
}

#[tokio::test]
async fn missing_token_blocks_the_request() {
    let api = Arc::new(FakeResourceApi::with_records(badges(3)));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "", 20);

    let outcome = list.reload(ListQueryPatch::default()).await;

    assert!(matches!(outcome, Err(AppError::Unauthorized(_))));
    assert_eq!(api.list_call_count().await, 0);
    assert_eq!(notifier.messages(), vec![REAUTHENTICATE_MESSAGE.to_owned()]);
    assert!(!list.is_loading().await);
}

#[tokio::test]
async fn scoped_resource_waits_for_parent_id() {
    let api: Arc<FakeResourceApi<GachaItem>> = Arc::new(FakeResourceApi::with_records(Vec::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = list_for::<GachaItemBinding>(&api, &notifier, "token", 20);

    let skipped = list.reload(ListQueryPatch::default()).await;
    assert_eq!(skipped, Ok(ReloadOutcome::Skipped));
    assert_eq!(api.list_call_count().await, 0);
    assert!(notifier.notifications().is_empty());

    let loaded = list
        .reload(ListQueryPatch {
            scope: Some(Some("summer".to_owned())),
            ..ListQueryPatch::default()
        })
        .await;
    assert_eq!(loaded, Ok(ReloadOutcome::Applied));
    assert_eq!(api.list_call_count().await, 1);
}

#[tokio::test]
async fn page_past_the_end_is_clamped_and_refetched() {
    let api = Arc::new(FakeResourceApi::with_records(badges(40)));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 20);

    let outcome = list.reload_settled(ListQueryPatch::page(3)).await;

    assert_eq!(outcome, Ok(ReloadOutcome::Applied));
    let calls = api.list_calls.lock().await.clone();
    assert_eq!(
        calls.iter().map(|query| query.page()).collect::<Vec<_>>(),
        vec![3, 2]
    );
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.query.page(), 2);
    assert_eq!(snapshot.result.items().len(), 20);
}

#[tokio::test]
async fn single_reload_reports_clamp() {
    let api = Arc::new(FakeResourceApi::with_records(badges(5)));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 2);

    let outcome = list.reload(ListQueryPatch::page(9)).await;

    assert_eq!(outcome, Ok(ReloadOutcome::Clamped { from: 9, to: 3 }));
    assert_eq!(list.query().await.page(), 3);
}

#[tokio::test]
async fn responses_after_unmount_are_dropped() {
    let api = Arc::new(FakeResourceApi::with_records(badges(2)));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 20);
    let release = api.hold_list("").await;

    let pending = {
        let list = list.clone();
        tokio::spawn(async move { list.reload(ListQueryPatch::default()).await })
    };
    api.wait_for_list_calls(1).await;
    list.mount().unmount();
    let _ = release.send(());

    let outcome = pending.await.unwrap_or_else(|_| unreachable!());
    assert_eq!(outcome, Ok(ReloadOutcome::Detached));
    assert!(list.result().await.is_empty());
}

#[tokio::test]
async fn filter_writes_reset_page_without_fetching() {
    let api = Arc::new(FakeResourceApi::with_records(badges(2)));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 20);
    assert!(list.set_filter(FilterKey::Page, "4").await.is_ok());

    assert!(list.set_filter(FilterKey::Status, "active").await.is_ok());

    let query = list.query().await;
    assert_eq!(query.page(), 1);
    assert_eq!(query.status(), Some("active"));
    assert_eq!(api.list_call_count().await, 0);
}

#[tokio::test]
async fn filter_write_discards_response_to_older_query() {
    let api = Arc::new(FakeResourceApi::with_records(badges(100)));
    let notifier = Arc::new(RecordingNotifier::default());
    let list = badge_list(&api, &notifier, "token", 20);
    let release = api.hold_list("").await;

    let pending = {
        let list = list.clone();
        tokio::spawn(async move { list.reload(ListQueryPatch::page(3)).await })
    };
    api.wait_for_list_calls(1).await;
    assert!(list.set_filter(FilterKey::Status, "active").await.is_ok());
    assert!(!list.is_loading().await);
    let _ = release.send(());

    let outcome = pending.await.unwrap_or_else(|_| unreachable!());
    assert_eq!(outcome, Ok(ReloadOutcome::Superseded));
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.query.page(), 1);
    assert_eq!(snapshot.query.status(), Some("active"));
    assert!(snapshot.result.is_empty());
}
