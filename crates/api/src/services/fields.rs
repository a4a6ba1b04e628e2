//! The field store seam and single-value writes on top of it.
//!
//! A field store reads and writes namespaced metafields on a customer. The
//! production store is [`AdminClient`](crate::shopify::AdminClient); tests
//! use an in-memory store.

use std::future::Future;

use spa_relay_core::{
    CustomerId, Field, FieldKey, FieldType, FieldWrite, MetafieldId, NewField, WriteTarget,
};
use tracing::instrument;

use crate::shopify::ShopifyError;

/// Get/create/update/delete for customer metafields.
///
/// Every method is a single upstream round trip with no retries.
pub trait FieldStore: Send + Sync {
    /// First field matching `key` on `owner`, or `None`.
    fn get_field(
        &self,
        owner: CustomerId,
        key: FieldKey,
    ) -> impl Future<Output = Result<Option<Field>, ShopifyError>> + Send;

    /// Persist a new field on `owner`.
    fn create_field(
        &self,
        owner: CustomerId,
        field: &NewField,
    ) -> impl Future<Output = Result<Field, ShopifyError>> + Send;

    /// Overwrite the value and type of an existing field.
    fn update_field(
        &self,
        id: MetafieldId,
        value: &str,
        field_type: &FieldType,
    ) -> impl Future<Output = Result<Field, ShopifyError>> + Send;

    /// Remove a field. A second delete of the same id fails with
    /// [`ShopifyError::NotFound`].
    fn delete_field(&self, id: MetafieldId) -> impl Future<Output = Result<(), ShopifyError>> + Send;
}

/// Execute a planned write: update the snapshot's field or create a new one.
///
/// Both branches wait for the upstream response.
///
/// # Errors
///
/// Returns the store's error if the write is rejected.
pub async fn apply_write<S: FieldStore>(
    store: &S,
    owner: CustomerId,
    write: &FieldWrite,
) -> Result<Field, ShopifyError> {
    match write.target {
        WriteTarget::Update(id) => store.update_field(id, &write.value, &write.field_type).await,
        WriteTarget::Create => store.create_field(owner, &write.to_new_field()).await,
    }
}

/// Store `value` as the single value of `key` on `owner`.
///
/// Reads the current field, then updates it in place or creates it.
///
/// # Errors
///
/// Returns the store's error if the read or the write fails.
#[instrument(skip(store, value), fields(customer_id = %owner, field = %key))]
pub async fn set_single_value<S: FieldStore>(
    store: &S,
    owner: CustomerId,
    key: FieldKey,
    field_type: FieldType,
    value: String,
) -> Result<Field, ShopifyError> {
    let snapshot = store.get_field(owner, key).await?;
    let write = FieldWrite::from_snapshot(key, snapshot.as_ref(), field_type, value);
    apply_write(store, owner, &write).await
}
