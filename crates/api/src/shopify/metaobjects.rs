//! Metaobject (spa record) operations over the GraphQL Admin API.

use spa_relay_core::{Metaobject, MetaobjectId};
use tracing::instrument;

use super::queries::{GetMetaobject, GetMetaobjects, get_metaobject, get_metaobjects};
use super::{AdminClient, ShopifyError};

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
    /// Opaque cursor to pass as `after` for the next page.
    pub end_cursor: Option<String>,
}

impl AdminClient {
    /// Get a metaobject by id.
    ///
    /// Returns `Ok(None)` when Shopify has no metaobject with that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns GraphQL errors.
    #[instrument(skip(self), fields(metaobject_id = %id))]
    pub async fn get_metaobject(
        &self,
        id: MetaobjectId,
    ) -> Result<Option<Metaobject>, ShopifyError> {
        let variables = get_metaobject::Variables { id: id.gid() };
        let response = self.execute::<GetMetaobject>(variables).await?;
        Ok(response.metaobject)
    }

    /// Get one page of metaobjects of `metaobject_type`.
    ///
    /// # Arguments
    ///
    /// * `metaobject_type` - Metaobject definition type, e.g. `spa`
    /// * `first` - Page size
    /// * `after` - Cursor from the previous page's `end_cursor`
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns GraphQL errors.
    #[instrument(skip(self))]
    pub async fn get_metaobjects_page(
        &self,
        metaobject_type: &str,
        first: u16,
        after: Option<String>,
    ) -> Result<Page<Metaobject>, ShopifyError> {
        let variables = get_metaobjects::Variables {
            metaobject_type: metaobject_type.to_string(),
            first: i64::from(first),
            after,
        };

        let connection = self
            .execute::<GetMetaobjects>(variables)
            .await?
            .metaobjects;

        Ok(Page {
            items: connection.nodes,
            has_next_page: connection.page_info.has_next_page,
            end_cursor: connection.page_info.end_cursor,
        })
    }
}
