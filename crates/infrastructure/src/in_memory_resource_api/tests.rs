use curator_application::ResourceApi;
use curator_core::AppError;
use curator_domain::{
    Badge, BadgeBinding, FilterKey, GachaItemBinding, ListQuery, Payload, RecordId,
};
use serde_json::json;

use super::InMemoryResourceApi;

fn badge(id: i64, name: &str, is_active: bool) -> Badge {
    Badge {
        id: RecordId::from(id),
        name: name.to_owned(),
        description: None,
        icon_url: None,
        is_active,
    }
}

fn payload(fields: serde_json::Value) -> Payload {
    fields.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn list_paginates_and_reports_total() {
    let store = InMemoryResourceApi::<BadgeBinding>::with_records(
        (1..=5)
            .map(|id| badge(id, format!("Badge {id}").as_str(), true))
            .collect(),
    );
    let mut query = ListQuery::new(2);
    query.set_page(3);

    let page = store
        .list("token", &query)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, RecordId::from(5));
    assert_eq!(page.total, Some(5));
    assert_eq!(page.page, Some(3));
}

#[tokio::test]
async fn status_filter_uses_the_toggle_flag() {
    let store = InMemoryResourceApi::<BadgeBinding>::with_records(vec![
        badge(1, "Night Owl", true),
        badge(2, "Early Bird", false),
    ]);
    let mut query = ListQuery::new(10);
    assert!(query.set_filter(FilterKey::Status, "inactive").is_ok());

    let page = store
        .list("token", &query)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Early Bird");
}

#[tokio::test]
async fn search_matches_any_field_case_insensitively() {
    let store = InMemoryResourceApi::<BadgeBinding>::with_records(vec![
        badge(1, "Night Owl", true),
        badge(2, "Early Bird", true),
    ]);
    let mut query = ListQuery::new(10);
    assert!(query.set_filter(FilterKey::Search, "owl").is_ok());

    let page = store
        .list("token", &query)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total, Some(1));
    assert_eq!(page.items[0].id, RecordId::from(1));
}

#[tokio::test]
async fn create_update_delete_round() {
    let store = InMemoryResourceApi::<BadgeBinding>::with_records(vec![badge(7, "Seed", true)]);

    let created = store
        .create("token", None, payload(json!({ "name": "Night Owl", "is_active": true })))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(created.message.as_deref(), Some("badge created"));
    assert_eq!(created.body.get("id"), Some(&json!("8")));

    let updated = store
        .update(
            "token",
            None,
            &RecordId::from(8),
            payload(json!({ "is_active": false })),
        )
        .await;
    assert!(updated.is_ok());

    let records = store.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].name, "Night Owl");
    assert!(!records[1].is_active);

    assert!(store.delete("token", None, &RecordId::from(7)).await.is_ok());
    let missing = store.delete("token", None, &RecordId::from(7)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn create_rejects_payloads_missing_record_fields() {
    let store = InMemoryResourceApi::<BadgeBinding>::new();

    let result = store
        .create("token", None, payload(json!({ "description": "no name" })))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(store.records().await.is_empty());
}

#[tokio::test]
async fn scoped_records_are_listed_per_parent() {
    let store = InMemoryResourceApi::<GachaItemBinding>::new();
    let item = payload(json!({ "item_name": "Golden Fox", "weight": 2, "rarity": "SSR" }));
    assert!(store.create("token", Some("summer"), item.clone()).await.is_ok());
    assert!(store.create("token", Some("winter"), item).await.is_ok());

    let mut query = ListQuery::new(10);
    assert!(query.set_filter(FilterKey::Scope, "winter").is_ok());
    let page = store
        .list("token", &query)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].pool_id, Some(RecordId::from("winter")));

    let unscoped = store.list("token", &ListQuery::new(10)).await;
    assert!(matches!(unscoped, Err(AppError::Validation(_))));
}
