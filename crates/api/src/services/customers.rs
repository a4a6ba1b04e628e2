//! Customer profile updates.

use chrono::NaiveDate;
use serde_json::Value;
use spa_relay_core::{CustomerId, Field, FieldKey, FieldType};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::shopify::{AdminClient, CustomerUpdate};

use super::fields::{FieldStore, set_single_value};
use super::locks::OwnerLocks;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Requested profile changes. Absent parts are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub customer: CustomerUpdate,
    pub date_of_birth: Option<NaiveDate>,
}

/// Parse a `YYYY-MM-DD` date of birth.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for anything that is not a calendar date.
pub fn parse_date_of_birth(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::BadRequest(format!("dob must be a YYYY-MM-DD date, got {raw:?}")))
}

/// Store `owner`'s date of birth in its `date` field.
///
/// # Errors
///
/// Returns [`AppError::Shopify`] if an upstream call fails.
pub async fn write_date_of_birth<S: FieldStore>(
    store: &S,
    locks: &OwnerLocks,
    owner: CustomerId,
    date: NaiveDate,
) -> Result<Field> {
    let _guard = locks.acquire(owner).await;
    let field = set_single_value(
        store,
        owner,
        FieldKey::DATE_OF_BIRTH,
        FieldType::Date,
        date.format(DATE_FORMAT).to_string(),
    )
    .await?;
    Ok(field)
}

/// Update `owner`'s name/email, then the date of birth if one was given.
///
/// Returns the upstream customer payload from the first call.
///
/// # Errors
///
/// Returns [`AppError::Shopify`] if either upstream step fails. The customer
/// record is not rolled back when the date of birth write fails.
#[instrument(skip(client, locks, profile), fields(customer_id = %owner))]
pub async fn update_profile(
    client: &AdminClient,
    locks: &OwnerLocks,
    owner: CustomerId,
    profile: &ProfileUpdate,
) -> Result<Value> {
    let customer = client.update_customer(owner, &profile.customer).await?;

    if let Some(date) = profile.date_of_birth {
        write_date_of_birth(client, locks, owner, date).await?;
    }

    info!(
        dob_updated = profile.date_of_birth.is_some(),
        "Customer profile updated"
    );
    Ok(customer)
}
