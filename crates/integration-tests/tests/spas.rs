//! Integration tests for spa lookups and listings.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::{Value, json};
use spa_relay_integration_tests::{SPA_COUNT, TestContext, spa_node};

#[tokio::test]
async fn test_spa_details() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/spa-details/12").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["spa"]["id"], "12");
    assert_eq!(body["spa"]["handle"], "spa-12");
    assert_eq!(body["spa"]["name"], "Spa 12");
    assert_eq!(body["spa"]["latitude"], "40.1200");

    let request = &ctx.shopify.graphql_bodies()[0];
    assert_eq!(request["variables"]["id"], "gid://shopify/Metaobject/12");
}

#[tokio::test]
async fn test_spa_details_not_found() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/spa-details/424242").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "Spa not found"}));
}

#[tokio::test]
async fn test_spa_details_rejects_malformed_id() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx.get("/spa-details/not-a-number").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.shopify.calls().total(), 0);
}

#[tokio::test]
async fn test_plain_listing_follows_every_page() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/spas").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], SPA_COUNT);
    let spas = body["spas"].as_array().unwrap();
    assert_eq!(spas.len(), SPA_COUNT);
    assert_eq!(spas[0]["id"], "1");
    assert_eq!(spas[SPA_COUNT - 1]["id"], SPA_COUNT.to_string());

    // 50 + 50 + 7
    assert_eq!(ctx.shopify.calls().graphql, 3);
    let afters: Vec<Value> = ctx
        .shopify
        .graphql_bodies()
        .iter()
        .map(|b| b["variables"]["after"].clone())
        .collect();
    assert_eq!(afters, vec![Value::Null, json!("cursor-50"), json!("cursor-100")]);
}

#[tokio::test]
async fn test_geojson_listing() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get("/spas/geojson").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "FeatureCollection");
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), SPA_COUNT);

    let first = &features[0];
    assert_eq!(first["type"], "Feature");
    assert_eq!(
        first["geometry"],
        json!({"type": "Point", "coordinates": [-73.99, 40.01]})
    );
    assert_eq!(first["properties"]["name"], "Spa 1");

    // Spa 10 has no coordinates but is still listed
    assert_eq!(features[9]["properties"]["id"], "10");
    assert_eq!(features[9]["geometry"], Value::Null);
}

#[tokio::test]
async fn test_listing_page_size_and_type() {
    let ctx = TestContext::new().await;
    let mut spas: Vec<Value> = (1..=5).map(spa_node).collect();
    let mut other = spa_node(6);
    other["type"] = json!("salon");
    spas.push(other);
    ctx.shopify.set_spas(spas);

    let (_, body) = ctx.get("/spas?page_size=2").await;
    assert_eq!(body["count"], 5);
    assert_eq!(ctx.shopify.calls().graphql, 3);
    assert_eq!(ctx.shopify.graphql_bodies()[0]["variables"]["first"], 2);

    let (_, body) = ctx.get("/spas?type=salon&page_size=100000").await;
    assert_eq!(body["count"], 1);
    let last = ctx.shopify.graphql_bodies().pop().unwrap();
    assert_eq!(last["variables"]["first"], 250);
    assert_eq!(last["variables"]["type"], "salon");
}

#[tokio::test]
async fn test_configured_metaobject_type() {
    let ctx = TestContext::with_vars(&[("SPA_METAOBJECT_TYPE", "salon")]).await;

    let (status, body) = ctx.get("/spas").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(ctx.shopify.graphql_bodies()[0]["variables"]["type"], "salon");
}

#[tokio::test]
async fn test_listing_stops_without_cursor() {
    let ctx = TestContext::new().await;
    ctx.shopify.drop_cursors();

    let (status, body) = ctx.get("/spas").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 50);
    assert_eq!(ctx.shopify.calls().graphql, 1);
}
