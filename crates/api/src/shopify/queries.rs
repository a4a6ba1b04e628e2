//! GraphQL query definitions for the Shopify Admin API.
//!
//! The metaobject queries are small and stable, so the request/response
//! types are written out here and wired to `graphql_client` through its
//! [`GraphQLQuery`] trait instead of schema code generation.

use graphql_client::{GraphQLQuery, QueryBody};

// =============================================================================
// Metaobject queries
// =============================================================================

/// Fetch one metaobject by global id.
pub struct GetMetaobject;

pub mod get_metaobject {
    use serde::{Deserialize, Serialize};
    use spa_relay_core::Metaobject;

    pub const OPERATION_NAME: &str = "GetMetaobject";
    pub const QUERY: &str = r"
query GetMetaobject($id: ID!) {
  metaobject(id: $id) {
    id
    handle
    type
    fields {
      key
      value
    }
  }
}
";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub metaobject: Option<Metaobject>,
    }
}

impl GraphQLQuery for GetMetaobject {
    type Variables = get_metaobject::Variables;
    type ResponseData = get_metaobject::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_metaobject::QUERY,
            operation_name: get_metaobject::OPERATION_NAME,
        }
    }
}

/// One page of metaobjects of a given type.
pub struct GetMetaobjects;

pub mod get_metaobjects {
    use serde::{Deserialize, Serialize};
    use spa_relay_core::Metaobject;

    pub const OPERATION_NAME: &str = "GetMetaobjects";
    pub const QUERY: &str = r"
query GetMetaobjects($type: String!, $first: Int!, $after: String) {
  metaobjects(type: $type, first: $first, after: $after) {
    nodes {
      id
      handle
      type
      fields {
        key
        value
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        #[serde(rename = "type")]
        pub metaobject_type: String,
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub metaobjects: MetaobjectConnection,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetaobjectConnection {
        #[serde(default)]
        pub nodes: Vec<Metaobject>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfo {
        pub has_next_page: bool,
        pub end_cursor: Option<String>,
    }
}

impl GraphQLQuery for GetMetaobjects {
    type Variables = get_metaobjects::Variables;
    type ResponseData = get_metaobjects::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_metaobjects::QUERY,
            operation_name: get_metaobjects::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_metaobjects_request_body() {
        let body = GetMetaobjects::build_query(get_metaobjects::Variables {
            metaobject_type: "spa".to_string(),
            first: 50,
            after: Some("cursor-1".to_string()),
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["variables"],
            json!({"type": "spa", "first": 50, "after": "cursor-1"})
        );
        assert_eq!(json["operationName"], "GetMetaobjects");
        assert!(json["query"].as_str().unwrap().contains("pageInfo"));
    }

    #[test]
    fn test_metaobject_response_decoding() {
        let data: get_metaobject::ResponseData = serde_json::from_value(json!({
            "metaobject": {
                "id": "gid://shopify/Metaobject/5",
                "handle": "city-spa",
                "type": "spa",
                "fields": [{"key": "name", "value": "City Spa"}]
            }
        }))
        .unwrap();
        let spa = data.metaobject.unwrap();
        assert_eq!(spa.field("name"), Some("City Spa"));
    }
}
