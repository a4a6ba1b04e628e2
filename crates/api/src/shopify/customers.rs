//! Customer profile operations over the REST Admin API.

use reqwest::Method;
use serde::Serialize;
use spa_relay_core::CustomerId;
use tracing::instrument;

use super::{AdminClient, ShopifyError};

/// Profile fields sent to `PUT customers/{id}.json`.
///
/// Unset fields are omitted so Shopify leaves them unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
struct CustomerBody<'a> {
    customer: CustomerFields<'a>,
}

#[derive(Debug, Serialize)]
struct CustomerFields<'a> {
    id: CustomerId,
    #[serde(flatten)]
    update: &'a CustomerUpdate,
}

impl AdminClient {
    /// Update a customer's profile.
    ///
    /// Returns Shopify's response payload (`{ "customer": {...} }`) unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the update.
    #[instrument(skip(self, update), fields(customer_id = %id))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<serde_json::Value, ShopifyError> {
        let path = format!("customers/{id}.json");
        let request = self.request(Method::PUT, &path).json(&CustomerBody {
            customer: CustomerFields { id, update },
        });
        self.send_json(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_customer_body_omits_unset_fields() {
        let update = CustomerUpdate {
            first_name: Some("Ada".to_string()),
            ..CustomerUpdate::default()
        };
        let body = CustomerBody {
            customer: CustomerFields {
                id: CustomerId::new(17),
                update: &update,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"customer": {"id": "17", "first_name": "Ada"}})
        );
    }
}
