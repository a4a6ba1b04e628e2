//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Liveness check
//!
//! # Customers
//! PUT  /update-customer/{customer_id}    - Update name, email and date of birth
//!
//! # Favorites
//! POST /spa-favorites/toggle             - Add or remove the favorite spa
//! GET  /spa-favorites/{customer_id}      - Favorite spa id
//! GET  /customer-favorite-spa/{customer_id} - Favorite spa with full record
//!
//! # Spas
//! GET  /spa-details/{spa_id}             - One spa record
//! GET  /spas                             - Every spa as a flat array
//! GET  /spas/geojson                     - Every spa as a GeoJSON FeatureCollection
//!
//! # Interactions
//! POST /api/track-add-to-cart            - Record an add-to-cart event
//! POST /api/track-wishlist               - Record a wishlist add/remove event
//! GET  /api/user-interactions            - Customer's events, newest first
//! ```

pub mod customers;
pub mod favorites;
pub mod interactions;
pub mod spas;

use std::str::FromStr;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts},
    routing::{get, post, put},
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use spa_relay_core::IdParseError;

use crate::error::AppError;
use crate::state::AppState;

/// Create the favorite routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(favorites::toggle))
        .route("/{customer_id}", get(favorites::show))
}

/// Create the spa listing routes router.
pub fn spa_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(spas::index))
        .route("/geojson", get(spas::geojson))
}

/// Create the interaction tracking API router.
pub fn interaction_routes() -> Router<AppState> {
    Router::new()
        .route("/track-add-to-cart", post(interactions::track_add_to_cart))
        .route("/track-wishlist", post(interactions::track_wishlist))
        .route("/user-interactions", get(interactions::index))
}

/// Create all routes for the relay.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/update-customer/{customer_id}",
            put(customers::update_customer),
        )
        .nest("/spa-favorites", favorite_routes())
        .route(
            "/customer-favorite-spa/{customer_id}",
            get(favorites::show_with_details),
        )
        .route("/spa-details/{spa_id}", get(spas::show))
        .nest("/spas", spa_routes())
        .nest("/api", interaction_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call Shopify.
async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Request helpers
// =============================================================================

/// JSON request body; malformed bodies are rejected as [`AppError::BadRequest`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Query string; malformed parameters are rejected as [`AppError::BadRequest`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// Parse an id from a path or body value.
pub(crate) fn parse_id<T>(raw: &str, what: &str) -> Result<T, AppError>
where
    T: FromStr<Err = IdParseError>,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid {what}: {e}")))
}

/// Accept a JSON string or number as an optional string. Empty strings and
/// `null` count as absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
