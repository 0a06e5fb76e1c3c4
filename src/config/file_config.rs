use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub dataset_path: Option<String>,
    pub assets_dir: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub content_cache_age_sec: Option<usize>,
    pub frontend_dir_path: Option<String>,
    pub session_idle_timeout_sec: Option<u64>,
    pub max_sessions: Option<usize>,

    pub map: Option<MapFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MapFileConfig {
    pub default_zoom: Option<u8>,
    pub cluster_radius_px: Option<f64>,
    pub max_cluster_zoom: Option<u8>,
    pub viewport_width_px: Option<u32>,
    pub viewport_height_px: Option<u32>,
    pub tile_url: Option<String>,
    pub attribution: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
