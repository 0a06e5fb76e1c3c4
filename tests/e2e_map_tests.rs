//! End-to-end tests for the map surface
//!
//! Tests map configuration, the feature collection, clustering and marker clicks.

mod common;

use common::{
    TestClient, TestServer, CENSUS_DROPPED_ROWS, CENSUS_RECORD_COUNT, CLUSTERED_ADULT_ID,
    CLUSTERED_JUVENILE_ID, CLUSTERED_UNKNOWN_ID, DEFAULT_ZOOM, LONE_SQUIRREL_ID,
};
use reqwest::StatusCode;
use serde_json::Value;

fn cluster_marker(clusters: &Value) -> &Value {
    clusters["markers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["kind"] == "cluster")
        .expect("No cluster marker")
}

// =============================================================================
// Map Configuration Tests
// =============================================================================

#[tokio::test]
async fn test_map_view_describes_dataset() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_map().await;
    assert_eq!(response.status(), StatusCode::OK);

    let map: Value = response.json().await.unwrap();
    assert_eq!(map["title"], "SQURL");
    assert_eq!(map["marker_icon"]["key"], "marker:squirrel");
    assert_eq!(map["marker_icon"]["size"], serde_json::json!([78, 77]));
    assert_eq!(map["viewport"]["zoom"], DEFAULT_ZOOM);
    assert_eq!(map["summary"]["records"], CENSUS_RECORD_COUNT);
    assert_eq!(map["summary"]["dropped_rows"], CENSUS_DROPPED_ROWS);
    assert_eq!(map["summary"]["first_survey_date"], "2018-07-06");
    assert_eq!(map["summary"]["last_survey_date"], "2018-10-14");
    assert!(map["tile_url"].as_str().unwrap().contains("{z}"));
}

#[tokio::test]
async fn test_features_are_geojson_in_csv_order() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_features().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/geo+json"
    );

    let collection: Value = response.json().await.unwrap();
    assert_eq!(collection["type"], "FeatureCollection");
    let ids: Vec<&str> = collection["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            CLUSTERED_ADULT_ID,
            CLUSTERED_JUVENILE_ID,
            CLUSTERED_UNKNOWN_ID,
            LONE_SQUIRREL_ID
        ]
    );

    let first = &collection["features"][0];
    assert_eq!(first["type"], "Feature");
    assert_eq!(first["geometry"]["type"], "Point");
    assert_eq!(
        first["geometry"]["coordinates"],
        serde_json::json!([-73.96, 40.78])
    );
}

// =============================================================================
// Clustering Tests
// =============================================================================

#[tokio::test]
async fn test_clusters_require_session() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_clusters().await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_nearby_squirrels_cluster_at_default_zoom() {
    let server = TestServer::spawn().await;
    let client = TestClient::with_session(server.base_url.clone()).await;

    let response = client.get_clusters().await;
    assert_eq!(response.status(), StatusCode::OK);

    let clusters: Value = response.json().await.unwrap();
    assert_eq!(clusters["zoom"], DEFAULT_ZOOM);

    let markers = clusters["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 2);

    let cluster = cluster_marker(&clusters);
    assert_eq!(cluster["count"], 3);
    assert_eq!(
        cluster["id"],
        format!("cluster:{}:{}", DEFAULT_ZOOM, CLUSTERED_ADULT_ID)
    );

    let lone = markers.iter().find(|m| m["kind"] == "feature").unwrap();
    assert_eq!(lone["id"], LONE_SQUIRREL_ID);
}

#[tokio::test]
async fn test_zooming_past_cluster_limit_shows_every_squirrel() {
    let server = TestServer::spawn().await;
    let client = TestClient::with_session(server.base_url.clone()).await;

    let response = client.set_viewport(40.78, -73.96, 19).await;
    assert_eq!(response.status(), StatusCode::OK);

    let clusters: Value = response.json().await.unwrap();
    assert_eq!(clusters["zoom"], 19);
    let markers = clusters["markers"].as_array().unwrap();
    assert_eq!(markers.len(), CENSUS_RECORD_COUNT);
    assert!(markers.iter().all(|m| m["kind"] == "feature"));

    // The session remembers the new grouping
    let clusters: Value = client.get_clusters().await.json().await.unwrap();
    assert_eq!(clusters["zoom"], 19);
}

// =============================================================================
// Click Tests
// =============================================================================

#[tokio::test]
async fn test_cluster_click_zooms_in() {
    let server = TestServer::spawn().await;
    let client = TestClient::with_session(server.base_url.clone()).await;

    let clusters: Value = client.get_clusters().await.json().await.unwrap();
    let cluster_id = cluster_marker(&clusters)["id"].as_str().unwrap().to_owned();

    let response = client.click_cluster(&cluster_id).await;
    assert_eq!(response.status(), StatusCode::OK);

    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["action"], "zoom_to_bounds");
    assert!(outcome["zoom"].as_u64().unwrap() > DEFAULT_ZOOM as u64);
    let bounds = &outcome["bounds"];
    assert!(bounds["south"].as_f64().unwrap() <= 40.7800);
    assert!(bounds["north"].as_f64().unwrap() >= 40.7802);
    assert!(outcome.get("detail").is_none());
}

#[tokio::test]
async fn test_feature_click_selects_and_empty_click_clears() {
    let server = TestServer::spawn().await;
    let client = TestClient::with_session(server.base_url.clone()).await;

    let response = client.click_feature(LONE_SQUIRREL_ID).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["action"], "selected");
    assert_eq!(outcome["id"], LONE_SQUIRREL_ID);
    assert_eq!(outcome["detail"]["id"], LONE_SQUIRREL_ID);

    let response = client.get_selected_detail().await;
    assert_eq!(response.status(), StatusCode::OK);

    let outcome: Value = client.click_empty().await.json().await.unwrap();
    assert_eq!(outcome["action"], "cleared");

    let response = client.get_selected_detail().await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_stale_cluster_click_keeps_selection() {
    let server = TestServer::spawn().await;
    let client = TestClient::with_session(server.base_url.clone()).await;

    client.click_feature(CLUSTERED_ADULT_ID).await;
    let stale_id = format!("cluster:{}:{}", DEFAULT_ZOOM, CLUSTERED_ADULT_ID);
    client.set_viewport(40.78, -73.96, 19).await;

    let outcome: Value = client.click_cluster(&stale_id).await.json().await.unwrap();
    assert_eq!(outcome["action"], "ignored");

    let response = client.get_selected_detail().await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail: Value = response.json().await.unwrap();
    assert_eq!(detail["id"], CLUSTERED_ADULT_ID);
}

#[tokio::test]
async fn test_unknown_feature_click_clears_selection() {
    let server = TestServer::spawn().await;
    let client = TestClient::with_session(server.base_url.clone()).await;

    client.click_feature(CLUSTERED_JUVENILE_ID).await;
    let outcome: Value = client
        .click_feature("5C-AM-1010-02")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(outcome["action"], "cleared");
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_home_reports_session_token() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let home: Value = client.get_home().await.json().await.unwrap();
    assert!(home["session_token"].is_null());
    assert_eq!(home["records"], CENSUS_RECORD_COUNT);

    let created: Value = client.create_session().await.json().await.unwrap();
    let home: Value = client.get_home().await.json().await.unwrap();
    assert_eq!(home["session_token"], created["token"]);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let server = TestServer::spawn().await;
    let first = TestClient::with_session(server.base_url.clone()).await;
    let second = TestClient::with_session(server.base_url.clone()).await;

    first.click_feature(LONE_SQUIRREL_ID).await;

    assert_eq!(first.get_selected_detail().await.status(), StatusCode::OK);
    assert_eq!(
        second.get_selected_detail().await.status(),
        StatusCode::NO_CONTENT
    );
}

#[tokio::test]
async fn test_ended_session_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::with_session(server.base_url.clone()).await;

    let response = client.end_session().await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.get_clusters().await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
