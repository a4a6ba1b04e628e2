//! Core types for the spa relay.
//!
//! This module provides type-safe wrappers for the domain concepts exchanged
//! with Shopify and with clients of the relay.

pub mod favorite;
pub mod field;
pub mod geojson;
pub mod id;
pub mod interaction;
pub mod metaobject;

pub use favorite::{FavoriteAction, FavoriteOutcome, InvalidFavoriteAction};
pub use field::{Field, FieldKey, FieldType, FieldWrite, NewField, WriteTarget};
pub use geojson::{Feature, FeatureCollection, Geometry};
pub use id::*;
pub use interaction::{EventType, InteractionEvent, InteractionLog, LogDecodeError};
pub use metaobject::{Metaobject, MetaobjectField};
