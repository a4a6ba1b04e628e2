//! Customer interaction tracking on an append-only JSON log field.

use serde_json::Value;
use spa_relay_core::{
    CustomerId, Field, FieldKey, FieldType, FieldWrite, InteractionEvent, InteractionLog,
};
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};

use super::fields::{FieldStore, apply_write};
use super::locks::OwnerLocks;

/// Decode a stored log, resetting to empty when the value is not JSON.
fn decode_or_reset(field: &Field) -> InteractionLog {
    InteractionLog::decode(&field.value).unwrap_or_else(|e| {
        warn!(
            error = %e,
            metafield_id = ?field.id,
            "Resetting unreadable interaction log"
        );
        InteractionLog::default()
    })
}

/// Plan the write that appends `event` to the log in `snapshot`.
///
/// With no snapshot the plan creates a new field holding `[event]`.
///
/// # Errors
///
/// Returns an error if the event cannot be encoded.
pub fn plan_append(
    snapshot: Option<&Field>,
    event: &InteractionEvent,
) -> std::result::Result<FieldWrite, serde_json::Error> {
    let mut log = snapshot.map(decode_or_reset).unwrap_or_default();
    log.push(event)?;

    Ok(FieldWrite::from_snapshot(
        FieldKey::CUSTOMER_INTERACTIONS,
        snapshot,
        FieldType::Json,
        log.encode(),
    ))
}

/// Append `event` to `owner`'s interaction log.
///
/// # Errors
///
/// Returns [`AppError::Shopify`] if the read or write is rejected upstream.
#[instrument(
    skip(store, locks, event),
    fields(customer_id = %owner, event_type = ?event.event_type)
)]
pub async fn append_event<S: FieldStore>(
    store: &S,
    locks: &OwnerLocks,
    owner: CustomerId,
    event: &InteractionEvent,
) -> Result<Field> {
    let _guard = locks.acquire(owner).await;

    let snapshot = store
        .get_field(owner, FieldKey::CUSTOMER_INTERACTIONS)
        .await?;
    let write = plan_append(snapshot.as_ref(), event)
        .map_err(|e| AppError::Internal(format!("Failed to encode interaction: {e}")))?;
    let field = apply_write(store, owner, &write).await?;

    info!(target_field = ?write.target, "Interaction recorded");
    Ok(field)
}

/// `owner`'s interactions, newest first.
///
/// A missing or unreadable log yields an empty list.
///
/// # Errors
///
/// Returns [`AppError::Shopify`] if the read is rejected upstream.
#[instrument(skip(store), fields(customer_id = %owner))]
pub async fn list_events<S: FieldStore>(store: &S, owner: CustomerId) -> Result<Vec<Value>> {
    let log = store
        .get_field(owner, FieldKey::CUSTOMER_INTERACTIONS)
        .await?
        .as_ref()
        .map(decode_or_reset)
        .unwrap_or_default();

    Ok(log.into_newest_first())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use spa_relay_core::{EventType, MetafieldId, WriteTarget};

    use super::super::fields::testing::MemoryFieldStore;
    use super::*;

    const OWNER: CustomerId = CustomerId::new(42);

    fn event(event_type: EventType, minute: u32) -> InteractionEvent {
        let mut event = InteractionEvent::new(
            event_type,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        );
        event.product_id = Some("p1".to_string());
        event.customer_id = Some(OWNER);
        event
    }

    fn stored_log(store: &MemoryFieldStore) -> Vec<Value> {
        let field = store.stored(OWNER, FieldKey::CUSTOMER_INTERACTIONS).unwrap();
        serde_json::from_str(&field.value).unwrap()
    }

    #[test]
    fn test_plan_append_without_snapshot_creates() {
        let write = plan_append(None, &event(EventType::AddToCart, 0)).unwrap();
        assert_eq!(write.target, WriteTarget::Create);
        assert_eq!(write.field_type, FieldType::Json);
        let log: Vec<Value> = serde_json::from_str(&write.value).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0]["eventType"], "add_to_cart");
    }

    #[test]
    fn test_plan_append_resets_garbage() {
        let snapshot = Field {
            id: Some(MetafieldId::new(9)),
            namespace: "custom".to_string(),
            key: "customer_interactions".to_string(),
            field_type: FieldType::Json,
            value: "not json{".to_string(),
        };
        let write = plan_append(Some(&snapshot), &event(EventType::WishlistAdd, 0)).unwrap();
        assert_eq!(write.target, WriteTarget::Update(MetafieldId::new(9)));
        let log: Vec<Value> = serde_json::from_str(&write.value).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_append_to_missing_log_writes_once() {
        let store = MemoryFieldStore::default();
        let locks = OwnerLocks::new(true);

        append_event(&store, &locks, OWNER, &event(EventType::AddToCart, 0))
            .await
            .unwrap();

        assert_eq!(stored_log(&store).len(), 1);
        assert_eq!(store.calls().writes(), 1);
        assert_eq!(store.calls().creates, 1);
    }

    #[tokio::test]
    async fn test_append_preserves_existing_entries() {
        let store = MemoryFieldStore::default();
        store.seed(
            OWNER,
            FieldKey::CUSTOMER_INTERACTIONS,
            FieldType::Json,
            r#"[{"eventType":"legacy","extra":true},{"eventType":"add_to_cart"}]"#,
        );
        let locks = OwnerLocks::new(true);

        append_event(&store, &locks, OWNER, &event(EventType::WishlistAdd, 1))
            .await
            .unwrap();

        let log = stored_log(&store);
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], json!({"eventType": "legacy", "extra": true}));
        assert_eq!(log[2]["eventType"], "wishlist_add");
        assert_eq!(store.calls().updates, 1);
        assert_eq!(store.calls().creates, 0);
    }

    #[tokio::test]
    async fn test_append_promotes_single_object() {
        let store = MemoryFieldStore::default();
        store.seed(
            OWNER,
            FieldKey::CUSTOMER_INTERACTIONS,
            FieldType::Json,
            r#"{"eventType":"add_to_cart","legacy":true}"#,
        );

        append_event(
            &store,
            &OwnerLocks::new(false),
            OWNER,
            &event(EventType::WishlistAdd, 2),
        )
        .await
        .unwrap();

        let log = stored_log(&store);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], json!({"eventType": "add_to_cart", "legacy": true}));
        assert_eq!(log[1]["eventType"], "wishlist_add");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let store = std::sync::Arc::new(MemoryFieldStore::default());
        let locks = OwnerLocks::new(true);

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                let locks = locks.clone();
                tokio::spawn(async move {
                    append_event(&*store, &locks, OWNER, &event(EventType::AddToCart, i))
                        .await
                        .is_ok()
                })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap());
        }

        assert_eq!(stored_log(&store).len(), 8);
        assert_eq!(store.calls().creates, 1);
    }

    #[tokio::test]
    async fn test_list_events_newest_first() {
        let store = MemoryFieldStore::default();
        store.seed(
            OWNER,
            FieldKey::CUSTOMER_INTERACTIONS,
            FieldType::Json,
            r#"[
                {"eventType":"a","timestamp":"2024-05-01T12:00:00.000Z"},
                {"eventType":"b"},
                {"eventType":"c","timestamp":"2024-05-01T12:05:00.000Z"}
            ]"#,
        );

        let events = list_events(&store, OWNER).await.unwrap();
        let order: Vec<_> = events.iter().map(|e| e["eventType"].clone()).collect();
        assert_eq!(order, vec![json!("c"), json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn test_list_events_missing_or_garbage_is_empty() {
        let store = MemoryFieldStore::default();
        assert!(list_events(&store, OWNER).await.unwrap().is_empty());

        store.seed(OWNER, FieldKey::CUSTOMER_INTERACTIONS, FieldType::Json, "{{");
        assert!(list_events(&store, OWNER).await.unwrap().is_empty());
        assert_eq!(store.calls().writes(), 0);
    }
}
