//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all map server
//! endpoints. When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a client without a map session
    ///
    /// Use this for the public routes and for checking session enforcement.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Automatically handle session cookies
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client that already holds a map session cookie
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be created (indicates test infrastructure problem).
    pub async fn with_session(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.create_session().await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Session creation failed: {:?}",
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Session Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Home request failed")
    }

    /// POST /v1/session
    pub async fn create_session(&self) -> Response {
        self.client
            .post(self.url("/v1/session"))
            .send()
            .await
            .expect("Create session request failed")
    }

    /// DELETE /v1/session
    pub async fn end_session(&self) -> Response {
        self.client
            .delete(self.url("/v1/session"))
            .send()
            .await
            .expect("End session request failed")
    }

    // ========================================================================
    // Map Endpoints
    // ========================================================================

    /// GET /v1/map
    pub async fn get_map(&self) -> Response {
        self.client
            .get(self.url("/v1/map"))
            .send()
            .await
            .expect("Get map request failed")
    }

    /// GET /v1/map/features
    pub async fn get_features(&self) -> Response {
        self.client
            .get(self.url("/v1/map/features"))
            .send()
            .await
            .expect("Get features request failed")
    }

    /// GET /v1/map/clusters
    pub async fn get_clusters(&self) -> Response {
        self.client
            .get(self.url("/v1/map/clusters"))
            .send()
            .await
            .expect("Get clusters request failed")
    }

    /// PUT /v1/map/viewport
    pub async fn set_viewport(&self, lat: f64, lon: f64, zoom: u8) -> Response {
        self.client
            .put(self.url("/v1/map/viewport"))
            .json(&json!({
                "center": { "lat": lat, "lon": lon },
                "zoom": zoom
            }))
            .send()
            .await
            .expect("Set viewport request failed")
    }

    /// POST /v1/map/click with a feature target
    pub async fn click_feature(&self, id: &str) -> Response {
        self.click(json!({ "kind": "feature", "id": id })).await
    }

    /// POST /v1/map/click with a cluster target
    pub async fn click_cluster(&self, id: &str) -> Response {
        self.click(json!({ "kind": "cluster", "id": id })).await
    }

    /// POST /v1/map/click on empty map
    pub async fn click_empty(&self) -> Response {
        self.click(json!({ "kind": "empty" })).await
    }

    async fn click(&self, target: serde_json::Value) -> Response {
        self.client
            .post(self.url("/v1/map/click"))
            .json(&target)
            .send()
            .await
            .expect("Map click request failed")
    }

    // ========================================================================
    // Detail Endpoints
    // ========================================================================

    /// GET /v1/detail
    pub async fn get_selected_detail(&self) -> Response {
        self.client
            .get(self.url("/v1/detail"))
            .send()
            .await
            .expect("Get selected detail request failed")
    }

    /// GET /v1/detail/{id}
    pub async fn get_detail(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/v1/detail/{}", id)))
            .send()
            .await
            .expect("Get detail request failed")
    }

    // ========================================================================
    // Sound Endpoints
    // ========================================================================

    /// GET /v1/sound
    pub async fn get_sound(&self) -> Response {
        self.client
            .get(self.url("/v1/sound"))
            .send()
            .await
            .expect("Get sound request failed")
    }

    /// POST /v1/sound/{channel}/click
    pub async fn click_sound(&self, channel: &str) -> Response {
        self.client
            .post(self.url(&format!("/v1/sound/{}/click", channel)))
            .send()
            .await
            .expect("Sound click request failed")
    }

    // ========================================================================
    // Asset Endpoints
    // ========================================================================

    /// GET /v1/assets/manifest
    pub async fn get_asset_manifest(&self) -> Response {
        self.client
            .get(self.url("/v1/assets/manifest"))
            .send()
            .await
            .expect("Get asset manifest request failed")
    }

    /// GET /assets/{file}
    pub async fn get_asset_file(&self, file: &str) -> Response {
        self.client
            .get(self.url(&format!("/assets/{}", file)))
            .send()
            .await
            .expect("Get asset file request failed")
    }
}
