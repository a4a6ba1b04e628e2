//! Customer metafield operations over the REST Admin API.
//!
//! This is the concrete [`FieldStore`] behind the interaction log, the
//! favorite toggle and the date-of-birth field.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use spa_relay_core::{CustomerId, Field, FieldKey, FieldType, MetafieldId, NewField};
use tracing::instrument;

use crate::services::fields::FieldStore;

use super::{AdminClient, ShopifyError};

/// `{ "metafields": [...] }`
#[derive(Debug, Deserialize)]
struct MetafieldList {
    #[serde(default)]
    metafields: Vec<Field>,
}

/// `{ "metafield": {...} }`
#[derive(Debug, Deserialize)]
struct MetafieldEnvelope {
    metafield: Field,
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    metafield: &'a NewField,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    metafield: UpdateFields<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateFields<'a> {
    id: MetafieldId,
    value: &'a str,
    #[serde(rename = "type")]
    field_type: &'a FieldType,
}

impl FieldStore for AdminClient {
    /// Get the first metafield matching `key` on a customer.
    ///
    /// The namespace/key filter is sent upstream and re-applied locally, so a
    /// store that ignores the query parameters still yields the right field.
    #[instrument(skip(self), fields(customer_id = %owner, field = %key))]
    async fn get_field(
        &self,
        owner: CustomerId,
        key: FieldKey,
    ) -> Result<Option<Field>, ShopifyError> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("namespace", key.namespace)
            .append_pair("key", key.key)
            .finish();
        let path = format!("customers/{owner}/metafields.json?{query}");

        let list: MetafieldList = self.send_json(self.request(Method::GET, &path)).await?;

        Ok(list
            .metafields
            .into_iter()
            .find(|field| key.matches(field)))
    }

    #[instrument(skip(self, field), fields(customer_id = %owner, namespace = %field.namespace, key = %field.key))]
    async fn create_field(
        &self,
        owner: CustomerId,
        field: &NewField,
    ) -> Result<Field, ShopifyError> {
        let path = format!("customers/{owner}/metafields.json");
        let request = self
            .request(Method::POST, &path)
            .json(&CreateBody { metafield: field });

        let created: MetafieldEnvelope = self.send_json(request).await?;
        tracing::debug!(metafield_id = ?created.metafield.id, "Metafield created");
        Ok(created.metafield)
    }

    #[instrument(skip(self, value), fields(metafield_id = %id, field_type = %field_type))]
    async fn update_field(
        &self,
        id: MetafieldId,
        value: &str,
        field_type: &FieldType,
    ) -> Result<Field, ShopifyError> {
        let path = format!("metafields/{id}.json");
        let request = self.request(Method::PUT, &path).json(&UpdateBody {
            metafield: UpdateFields {
                id,
                value,
                field_type,
            },
        });

        let updated: MetafieldEnvelope = self.send_json(request).await?;
        Ok(updated.metafield)
    }

    #[instrument(skip(self), fields(metafield_id = %id))]
    async fn delete_field(&self, id: MetafieldId) -> Result<(), ShopifyError> {
        let path = format!("metafields/{id}.json");
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}
