//! Favorite spa route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use spa_relay_core::{CustomerId, FavoriteAction, MetaobjectId};

use crate::error::{AppError, Result, set_sentry_customer};
use crate::services::favorites::{get_favorite, set_favorite};
use crate::services::spas::{FavoriteDetails, favorite_with_details};
use crate::state::AppState;

use super::{JsonBody, lenient_string, parse_id};

/// Body of `POST /spa-favorites/toggle`.
///
/// Storefront scripts also send `spa_handle`; it is not needed and ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub spa_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// A validated toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub owner: CustomerId,
    pub spa: MetaobjectId,
    pub action: FavoriteAction,
}

impl ToggleRequest {
    /// Validate the body. Nothing is sent upstream for an invalid request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] without a customer id, otherwise
    /// [`AppError::BadRequest`] for missing or malformed input.
    pub fn validate(self) -> Result<Toggle> {
        let customer_id = self
            .customer_id
            .ok_or_else(|| AppError::Unauthorized("Customer ID is required".to_string()))?;

        let (Some(spa_id), Some(action)) = (self.spa_id, self.action.filter(|a| !a.is_empty()))
        else {
            return Err(AppError::BadRequest(
                "Spa ID and action are required".to_string(),
            ));
        };

        let action = action.parse::<FavoriteAction>().map_err(|_| {
            AppError::BadRequest(r#"Invalid action. Use "add" or "remove""#.to_string())
        })?;

        Ok(Toggle {
            owner: parse_id(&customer_id, "customer id")?,
            spa: parse_id(&spa_id, "spa id")?,
            action,
        })
    }
}

/// Add or remove the customer's favorite spa.
pub async fn toggle(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ToggleRequest>,
) -> Result<Json<Value>> {
    let toggle = body.validate()?;
    set_sentry_customer(&toggle.owner);

    let outcome = set_favorite(
        state.shopify(),
        state.locks(),
        toggle.owner,
        toggle.spa,
        toggle.action,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": outcome.message(),
        "action": outcome,
    })))
}

/// The customer's favorite spa id.
pub async fn show(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Value>> {
    let owner: CustomerId = parse_id(&customer_id, "customer id")?;

    let body = match get_favorite(state.shopify(), owner).await? {
        Some(favorite) => json!({
            "success": true,
            "favorite_spa_id": favorite.spa_id,
            "gid": favorite.gid,
        }),
        None => json!({
            "success": true,
            "favorite_spa_id": null,
            "message": "No favorite spa found",
        }),
    };
    Ok(Json(body))
}

/// The customer's favorite spa with its full record.
pub async fn show_with_details(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Value>> {
    let owner: CustomerId = parse_id(&customer_id, "customer id")?;

    let body = match favorite_with_details(state.shopify(), owner).await? {
        FavoriteDetails::Found(spa) => json!({
            "success": true,
            "spa": spa,
        }),
        FavoriteDetails::NoFavorite => json!({
            "success": true,
            "message": "No favorite spa found",
            "spa": null,
        }),
        FavoriteDetails::Unavailable => json!({
            "success": false,
            "message": "Error fetching spa details",
            "spa": null,
        }),
    };
    Ok(Json(body))
}
