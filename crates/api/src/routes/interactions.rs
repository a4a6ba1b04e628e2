//! Interaction tracking route handlers.
//!
//! Anonymous visitors (a `visitorId` but no `customerId`) are acknowledged
//! without storing anything; only customers have a log.

use axum::{
    Json,
    extract::State,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use spa_relay_core::{CustomerId, EventType, InteractionEvent};
use tracing::debug;

use crate::error::{AppError, Result, set_sentry_customer};
use crate::services::interactions::{append_event, list_events};
use crate::state::AppState;

use super::{JsonBody, QueryParams, lenient_string, parse_id};

/// Body of the tracking endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub variant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub visitor_id: Option<String>,
    /// Only read by the wishlist endpoint.
    #[serde(default)]
    pub event_type: Option<String>,
}

impl TrackRequest {
    /// Build the event to record and the customer whose log receives it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if neither a customer nor a visitor
    /// is identified, or the customer id is malformed.
    pub fn into_event(self, event_type: EventType) -> Result<(Option<CustomerId>, InteractionEvent)> {
        if self.customer_id.is_none() && self.visitor_id.is_none() {
            return Err(AppError::BadRequest(
                "customerId or visitorId is required".to_string(),
            ));
        }

        let owner = self
            .customer_id
            .as_deref()
            .map(|raw| parse_id::<CustomerId>(raw, "customer id"))
            .transpose()?;

        let mut event = InteractionEvent::new(event_type, Utc::now());
        event.product_id = self.product_id;
        event.variant_id = self.variant_id;
        event.customer_id = owner;
        event.visitor_id = self.visitor_id;

        Ok((owner, event))
    }

    fn wishlist_event_type(&self) -> Result<EventType> {
        match self.event_type.as_deref() {
            Some("wishlist_add") => Ok(EventType::WishlistAdd),
            Some("wishlist_remove") => Ok(EventType::WishlistRemove),
            _ => Err(AppError::BadRequest(
                r#"eventType must be "wishlist_add" or "wishlist_remove""#.to_string(),
            )),
        }
    }
}

async fn record(state: &AppState, body: TrackRequest, event_type: EventType) -> Result<Json<Value>> {
    let (owner, event) = body.into_event(event_type)?;

    match owner {
        Some(owner) => {
            set_sentry_customer(&owner);
            append_event(state.shopify(), state.locks(), owner, &event).await?;
        }
        None => debug!(event_type = ?event_type, "Visitor event acknowledged, not stored"),
    }

    Ok(Json(json!({ "success": true })))
}

/// Record an add-to-cart event.
pub async fn track_add_to_cart(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TrackRequest>,
) -> Result<Json<Value>> {
    record(&state, body, EventType::AddToCart).await
}

/// Record a wishlist add or remove event.
pub async fn track_wishlist(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TrackRequest>,
) -> Result<Json<Value>> {
    let event_type = body.wishlist_event_type()?;
    record(&state, body, event_type).await
}

/// Query for `GET /api/user-interactions`.
#[derive(Debug, Deserialize)]
pub struct InteractionsQuery {
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// A customer's interactions, newest first.
pub async fn index(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<InteractionsQuery>,
) -> Result<Json<Value>> {
    let customer_id = query
        .customer_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("customer_id parameter is required".to_string()))?;
    let owner: CustomerId = parse_id(&customer_id, "customer id")?;

    let interactions = list_events(state.shopify(), owner).await?;

    Ok(Json(json!({
        "success": true,
        "count": interactions.len(),
        "interactions": interactions,
    })))
}
