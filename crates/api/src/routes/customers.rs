//! Customer profile route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::Value;
use spa_relay_core::CustomerId;

use crate::error::{Result, set_sentry_customer};
use crate::services::customers::{ProfileUpdate, parse_date_of_birth, update_profile};
use crate::shopify::CustomerUpdate;
use crate::state::AppState;

use super::{JsonBody, parse_id};

/// Body of `PUT /update-customer/{customer_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `YYYY-MM-DD`. Left unchanged when absent or empty.
    pub dob: Option<String>,
}

impl UpdateCustomerRequest {
    fn into_profile(self) -> Result<ProfileUpdate> {
        let date_of_birth = self
            .dob
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_date_of_birth)
            .transpose()?;

        Ok(ProfileUpdate {
            customer: CustomerUpdate {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
            },
            date_of_birth,
        })
    }
}

/// Update a customer's profile and return Shopify's customer payload.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    JsonBody(body): JsonBody<UpdateCustomerRequest>,
) -> Result<Json<Value>> {
    let owner: CustomerId = parse_id(&customer_id, "customer id")?;
    let profile = body.into_profile()?;
    set_sentry_customer(&owner);

    let customer = update_profile(state.shopify(), state.locks(), owner, &profile).await?;
    Ok(Json(customer))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_into_profile_parses_dob() {
        let profile = UpdateCustomerRequest {
            first_name: Some("Ada".to_string()),
            dob: Some("1990-04-15".to_string()),
            ..Default::default()
        }
        .into_profile()
        .unwrap();

        assert_eq!(profile.customer.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 15));
    }

    #[test]
    fn test_into_profile_empty_dob_is_absent() {
        let profile = UpdateCustomerRequest {
            dob: Some(String::new()),
            ..Default::default()
        }
        .into_profile()
        .unwrap();
        assert!(profile.date_of_birth.is_none());
    }

    #[test]
    fn test_into_profile_rejects_bad_dob() {
        let err = UpdateCustomerRequest {
            dob: Some("April 15".to_string()),
            ..Default::default()
        }
        .into_profile()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
