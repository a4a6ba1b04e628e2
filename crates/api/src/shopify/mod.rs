//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the Admin API access token.** The token grants write
//! access to customer records and metafields, so the relay must only be
//! exposed behind the configured CORS origins.
//!
//! # Architecture
//!
//! - REST Admin API for customers and metafields (the field store)
//! - GraphQL Admin API for metaobjects, using `graphql_client` envelopes
//! - Direct API calls; no local cache, no retries, one round trip per call
//!
//! # Example
//!
//! ```rust,ignore
//! use spa_relay_api::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! // Read a customer's date of birth
//! let dob = client.get_field(customer_id, FieldKey::DATE_OF_BIRTH).await?;
//!
//! // Fetch one spa record
//! let spa = client.get_metaobject(MetaobjectId::new(42)).await?;
//! ```

mod client;
mod customers;
mod metafields;
mod metaobjects;
pub mod queries;

pub use client::AdminClient;
pub use customers::CustomerUpdate;
pub use metaobjects::Page;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("Shopify returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, parsed as JSON when possible.
        body: serde_json::Value,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {path}")]
    NotFound {
        /// Request path or resource that was missing.
        path: String,
        /// Response body, parsed as JSON when possible.
        body: serde_json::Value,
    },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl ShopifyError {
    /// Upstream payload worth surfacing to API clients for diagnostics.
    #[must_use]
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::Status { body, .. } | Self::NotFound { body, .. } => body.clone(),
            Self::GraphQL(errors) => serde_json::Value::Array(
                errors
                    .iter()
                    .map(|e| serde_json::Value::String(e.message.clone()))
                    .collect(),
            ),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .map(|e| {
            if e.path.is_empty() {
                e.message.clone()
            } else {
                let path = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                format!("{} (at {path})", e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
