//! A customer's single favorite spa, stored as a metaobject reference field.

use serde::Serialize;
use spa_relay_core::{
    CustomerId, FavoriteAction, FavoriteOutcome, FieldKey, FieldType, MetaobjectId,
};
use tracing::{info, instrument};

use crate::error::Result;
use crate::shopify::ShopifyError;

use super::fields::{FieldStore, set_single_value};
use super::locks::OwnerLocks;

/// Prefix of a stored metaobject reference.
pub const REFERENCE_PREFIX: &str = "gid://shopify/Metaobject/";

/// The stored favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    /// Reference with [`REFERENCE_PREFIX`] removed.
    pub spa_id: String,
    /// Reference as stored.
    pub gid: String,
}

impl Favorite {
    fn from_reference(reference: &str) -> Self {
        Self {
            spa_id: reference
                .strip_prefix(REFERENCE_PREFIX)
                .unwrap_or(reference)
                .to_string(),
            gid: reference.to_string(),
        }
    }
}

/// Add or remove `owner`'s favorite spa.
///
/// Adding overwrites any previous favorite. Removing deletes the field if one
/// exists; a field already gone upstream counts as removed.
///
/// # Errors
///
/// Returns [`AppError::Shopify`](crate::error::AppError::Shopify) if an
/// upstream call fails.
#[instrument(skip(store, locks), fields(customer_id = %owner, spa_id = %spa))]
pub async fn set_favorite<S: FieldStore>(
    store: &S,
    locks: &OwnerLocks,
    owner: CustomerId,
    spa: MetaobjectId,
    action: FavoriteAction,
) -> Result<FavoriteOutcome> {
    let _guard = locks.acquire(owner).await;

    let outcome = match action {
        FavoriteAction::Add => {
            set_single_value(
                store,
                owner,
                FieldKey::SPA_FAVOURITE,
                FieldType::MetaobjectReference,
                spa.gid(),
            )
            .await?;
            FavoriteOutcome::Added
        }
        FavoriteAction::Remove => {
            let existing = store.get_field(owner, FieldKey::SPA_FAVOURITE).await?;
            match existing.and_then(|field| field.id) {
                Some(id) => match store.delete_field(id).await {
                    Ok(()) | Err(ShopifyError::NotFound { .. }) => FavoriteOutcome::Removed,
                    Err(e) => return Err(e.into()),
                },
                None => FavoriteOutcome::None,
            }
        }
    };

    info!(outcome = ?outcome, "Favorite updated");
    Ok(outcome)
}

/// `owner`'s favorite spa, if one is stored with a non-empty value.
///
/// # Errors
///
/// Returns [`AppError::Shopify`](crate::error::AppError::Shopify) if the read
/// fails.
#[instrument(skip(store), fields(customer_id = %owner))]
pub async fn get_favorite<S: FieldStore>(store: &S, owner: CustomerId) -> Result<Option<Favorite>> {
    let field = store.get_field(owner, FieldKey::SPA_FAVOURITE).await?;
    Ok(field
        .filter(|field| !field.value.is_empty())
        .map(|field| Favorite::from_reference(&field.value)))
}
