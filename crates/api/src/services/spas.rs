//! Spa records: single lookups, the customer's favorite, and full listings.

use serde_json::{Map, Value};
use spa_relay_core::{CustomerId, FeatureCollection, Metaobject, MetaobjectId};
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::shopify::AdminClient;

use super::favorites::get_favorite;
use super::pagination::collect_all;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u16 = 50;

/// Largest page the Admin API accepts.
pub const MAX_PAGE_SIZE: u16 = 250;

/// Requested page size limited to `1..=MAX_PAGE_SIZE`.
#[must_use]
pub fn clamp_page_size(requested: Option<u32>) -> u16 {
    requested.map_or(DEFAULT_PAGE_SIZE, |size| {
        u16::try_from(size.clamp(1, u32::from(MAX_PAGE_SIZE))).unwrap_or(MAX_PAGE_SIZE)
    })
}

/// Flattened record for one spa.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if no spa has this id, or
/// [`AppError::Shopify`] if the query fails.
#[instrument(skip(client), fields(spa_id = %spa))]
pub async fn get_details(client: &AdminClient, spa: MetaobjectId) -> Result<Map<String, Value>> {
    client
        .get_metaobject(spa)
        .await?
        .map(|metaobject| metaobject.flatten())
        .ok_or_else(|| AppError::NotFound("Spa not found".to_string()))
}

/// Result of resolving a customer's favorite into a spa record.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteDetails {
    /// No favorite is stored.
    NoFavorite,
    /// A favorite is stored but the spa it names could not be loaded.
    Unavailable,
    /// The favorite spa's flattened record.
    Found(Map<String, Value>),
}

/// `owner`'s favorite spa with its full record.
///
/// # Errors
///
/// Returns [`AppError::Shopify`] if an upstream call fails.
#[instrument(skip(client), fields(customer_id = %owner))]
pub async fn favorite_with_details(
    client: &AdminClient,
    owner: CustomerId,
) -> Result<FavoriteDetails> {
    let Some(favorite) = get_favorite(client, owner).await? else {
        return Ok(FavoriteDetails::NoFavorite);
    };

    let Ok(spa) = favorite.gid.parse::<MetaobjectId>() else {
        warn!(reference = %favorite.gid, "Stored favorite is not a metaobject reference");
        return Ok(FavoriteDetails::Unavailable);
    };

    match get_details(client, spa).await {
        Ok(details) => Ok(FavoriteDetails::Found(details)),
        Err(AppError::NotFound(_)) => {
            warn!(spa_id = %spa, "Favorite spa no longer exists");
            Ok(FavoriteDetails::Unavailable)
        }
        Err(e) => Err(e),
    }
}

/// Every metaobject of `metaobject_type`, following cursors to the end.
///
/// # Errors
///
/// Returns [`AppError::Shopify`] if any page fails; nothing partial is
/// returned.
#[instrument(skip(client))]
pub async fn list_all(
    client: &AdminClient,
    metaobject_type: &str,
    page_size: u16,
) -> Result<Vec<Metaobject>> {
    let spas = collect_all(|after| client.get_metaobjects_page(metaobject_type, page_size, after))
        .await?;
    info!(count = spas.len(), "Listed spas");
    Ok(spas)
}

/// Flattened records, in listing order.
#[must_use]
pub fn to_plain(spas: &[Metaobject]) -> Vec<Map<String, Value>> {
    spas.iter().map(Metaobject::flatten).collect()
}

/// GeoJSON collection with one feature per spa, in listing order.
///
/// Spas without usable coordinates keep a `null` geometry.
#[must_use]
pub fn to_feature_collection(spas: &[Metaobject]) -> FeatureCollection {
    spas.iter().map(Metaobject::to_feature).collect()
}
