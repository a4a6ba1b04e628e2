//! Spa route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use spa_relay_core::{FeatureCollection, Metaobject, MetaobjectId};

use crate::error::Result;
use crate::services::spas::{
    clamp_page_size, get_details, list_all, to_feature_collection, to_plain,
};
use crate::state::AppState;

use super::{QueryParams, parse_id};

/// Query for the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Metaobject type; defaults to `SPA_METAOBJECT_TYPE`.
    #[serde(default, rename = "type")]
    pub metaobject_type: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

async fn fetch_all(state: &AppState, query: ListQuery) -> Result<Vec<Metaobject>> {
    let metaobject_type = query
        .metaobject_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| state.config().spa_metaobject_type.clone());

    list_all(
        state.shopify(),
        &metaobject_type,
        clamp_page_size(query.page_size),
    )
    .await
}

/// One spa's flattened record.
pub async fn show(
    State(state): State<AppState>,
    Path(spa_id): Path<String>,
) -> Result<Json<Value>> {
    let spa: MetaobjectId = parse_id(&spa_id, "spa id")?;
    let details = get_details(state.shopify(), spa).await?;

    Ok(Json(json!({
        "success": true,
        "spa": details,
    })))
}

/// Every spa as flattened records.
pub async fn index(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<Value>> {
    let spas = to_plain(&fetch_all(&state, query).await?);

    Ok(Json(json!({
        "success": true,
        "count": spas.len(),
        "spas": spas,
    })))
}

/// Every spa as a GeoJSON `FeatureCollection`.
pub async fn geojson(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<Json<FeatureCollection>> {
    let spas = fetch_all(&state, query).await?;
    Ok(Json(to_feature_collection(&spas)))
}
