//! Shopify Admin API transport: REST requests and GraphQL execution.
//!
//! Every call is a single round trip. Non-success statuses are turned into
//! [`ShopifyError`] with the upstream payload preserved for diagnostics.

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ShopifyAdminConfig;

use super::{GraphQLError, ShopifyError};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin API client.
///
/// Cheaply cloneable; all clones share one connection pool.
///
/// # Security
///
/// This client carries the Admin API token, which has HIGH PRIVILEGE access
/// to the store.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    access_token: SecretString,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Arguments
    ///
    /// * `config` - Shopify Admin API configuration
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Admin API base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }

    /// Absolute URL for a path relative to the API base, e.g. `metafields/1.json`.
    pub(super) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Start an authenticated REST request.
    pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .client
            .request(method, self.endpoint(path))
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
    }

    // =========================================================================
    // REST Execution
    // =========================================================================

    /// Send a REST request and decode a JSON response body.
    pub(super) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ShopifyError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&text, 500),
                "Failed to parse Shopify REST response"
            );
            ShopifyError::Parse(e)
        })
    }

    /// Send a REST request, returning the raw body of a success response.
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<String, ShopifyError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            // Retry-After is a small, non-negative number of seconds
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<f64>().ok())
                .map_or(1, |secs| secs.ceil() as u64);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ShopifyError::Unauthorized(truncate(&text, 200)));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                path: url,
                body: upstream_body(&text),
            });
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %url,
                body = %truncate(&text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: upstream_body(&text),
            });
        }

        Ok(text)
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL query against `graphql.json`.
    pub(super) async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let body = Q::build_query(variables);
        let request = self
            .request(Method::POST, "graphql.json")
            .header("Content-Type", "application/json")
            .json(&body);

        let text = self.send(request).await?;

        let response: Response<Q::ResponseData> = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&text, 500),
                "Failed to parse Shopify GraphQL response"
            );
            ShopifyError::Parse(e)
        })?;

        // Check for GraphQL errors
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            ShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                path: vec![],
            }])
        })
    }
}

/// Error response body as JSON, or its truncated text when it isn't JSON.
fn upstream_body(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(truncate(text, 500)))
}

/// First `max` characters of `text`, for logs and error payloads.
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
