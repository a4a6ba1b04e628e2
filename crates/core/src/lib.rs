//! Spa Relay Core - Shared types library.
//!
//! This crate provides the types shared by the relay service and its tests:
//! - `api` - HTTP façade over the Shopify Admin API
//! - `integration-tests` - end-to-end tests against a mock upstream
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! HTTP clients. Everything that talks to Shopify lives in the `api` crate.
//!
//! # Modules
//!
//! - [`types`] - Shopify ids, metafields, interaction logs, favorites,
//!   metaobjects and GeoJSON

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
