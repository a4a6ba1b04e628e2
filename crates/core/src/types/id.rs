//! Newtype IDs for type-safe Shopify resource references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different resource types. Every ID knows its
//! Shopify global-id kind, so `gid://shopify/Customer/123` and `123` parse to
//! the same [`CustomerId`].

use thiserror::Error;

/// Prefix shared by every Shopify global id.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a Shopify ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input is a global id for a different resource kind.
    #[error("expected a {expected} id, got {found}")]
    WrongKind {
        /// Resource kind the caller asked for.
        expected: &'static str,
        /// Resource kind found in the global id.
        found: String,
    },
    /// The numeric part is not a positive integer.
    #[error("invalid id: {0}")]
    Invalid(String),
}

/// Parse either a bare numeric id or a global id of the given kind.
///
/// # Errors
///
/// Returns an error if the input is empty, names another resource kind, or
/// does not end in a positive integer.
pub fn parse_shopify_id(input: &str, kind: &'static str) -> Result<u64, IdParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IdParseError::Empty);
    }

    let numeric = match trimmed.strip_prefix(GID_PREFIX) {
        Some(rest) => {
            let (found, id) = rest
                .split_once('/')
                .ok_or_else(|| IdParseError::Invalid(trimmed.to_string()))?;
            if found != kind {
                return Err(IdParseError::WrongKind {
                    expected: kind,
                    found: found.to_string(),
                });
            }
            id
        }
        None => trimmed,
    };

    match numeric.parse::<u64>() {
        Ok(0) | Err(_) => Err(IdParseError::Invalid(trimmed.to_string())),
        Ok(id) => Ok(id),
    }
}

/// Macro to define a type-safe Shopify ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize` as a decimal string (safe for JavaScript clients)
/// - `Deserialize` from a JSON number, a numeric string, or a global id
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `FromStr`, `Display`, and `gid()` for the `gid://shopify/<Kind>/<n>` form
///
/// # Example
///
/// ```rust
/// # use spa_relay_core::define_id;
/// define_id!(ProductId, "Product");
///
/// let id: ProductId = "gid://shopify/Product/42".parse().unwrap();
/// assert_eq!(id.as_u64(), 42);
/// assert_eq!(id.gid(), "gid://shopify/Product/42");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Shopify global-id resource kind.
            pub const KIND: &'static str = $kind;

            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            /// Render the id as a Shopify global id.
            #[must_use]
            pub fn gid(&self) -> String {
                format!("{}{}/{}", $crate::types::id::GID_PREFIX, $kind, self.0)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdParseError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $crate::types::id::parse_shopify_id(s, $kind).map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                #[derive(::serde::Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Number(u64),
                    Text(String),
                }

                match Raw::deserialize(deserializer)? {
                    Raw::Number(0) => Err(::serde::de::Error::custom("id must be positive")),
                    Raw::Number(id) => Ok(Self(id)),
                    Raw::Text(text) => text.parse().map_err(::serde::de::Error::custom),
                }
            }
        }
    };
}

define_id!(CustomerId, "Customer");
define_id!(MetafieldId, "Metafield");
define_id!(MetaobjectId, "Metaobject");
