mod file_config;

pub use file_config::{FileConfig, MapFileConfig};

use crate::map::{ClusterPolicy, PresenterSettings, ViewportSize, MAX_ZOOM};
use crate::server::{RequestsLoggingLevel, DEFAULT_MAX_SESSIONS};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_TILE_URL: &str =
    "https://tiles.stadiamaps.com/tiles/alidade_smooth_dark/{z}/{x}/{y}{r}.png";
pub const DEFAULT_ATTRIBUTION: &str = "&copy; <a href=\"https://stadiamaps.com/\">Stadia Maps</a> ";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub dataset_path: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub session_idle_timeout_sec: u64,
    pub max_sessions: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            dataset_path: None,
            assets_dir: None,
            port: 0,
            metrics_port: 0,
            logging_level: RequestsLoggingLevel::default(),
            content_cache_age_sec: 0,
            frontend_dir_path: None,
            session_idle_timeout_sec: 0,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub session_idle_timeout_sec: u64,
    pub max_sessions: usize,

    pub map: MapSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub default_zoom: u8,
    pub cluster_radius_px: f64,
    pub max_cluster_zoom: u8,
    pub viewport_size: ViewportSize,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_zoom: 15,
            cluster_radius_px: 50.0,
            max_cluster_zoom: 18,
            viewport_size: ViewportSize::default(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

impl MapSettings {
    fn resolve(file: MapFileConfig) -> Result<Self> {
        let defaults = Self::default();
        let default_zoom = file.default_zoom.unwrap_or(defaults.default_zoom);
        if default_zoom > MAX_ZOOM {
            bail!("map.default_zoom must be at most {}, got {}", MAX_ZOOM, default_zoom);
        }
        let max_cluster_zoom = file.max_cluster_zoom.unwrap_or(defaults.max_cluster_zoom);
        if max_cluster_zoom > MAX_ZOOM {
            bail!(
                "map.max_cluster_zoom must be at most {}, got {}",
                MAX_ZOOM,
                max_cluster_zoom
            );
        }
        let cluster_radius_px = file.cluster_radius_px.unwrap_or(defaults.cluster_radius_px);
        if !cluster_radius_px.is_finite() || cluster_radius_px < 0.0 {
            bail!("map.cluster_radius_px must be a non-negative number");
        }
        let viewport_size = ViewportSize {
            width_px: file
                .viewport_width_px
                .unwrap_or(defaults.viewport_size.width_px),
            height_px: file
                .viewport_height_px
                .unwrap_or(defaults.viewport_size.height_px),
        };
        if viewport_size.width_px == 0 || viewport_size.height_px == 0 {
            bail!("map viewport size must not be empty");
        }

        Ok(Self {
            default_zoom,
            cluster_radius_px,
            max_cluster_zoom,
            viewport_size,
            tile_url: file.tile_url.unwrap_or(defaults.tile_url),
            attribution: file.attribution.unwrap_or(defaults.attribution),
        })
    }

    pub fn presenter_settings(&self) -> PresenterSettings {
        PresenterSettings {
            policy: ClusterPolicy {
                radius_px: self.cluster_radius_px,
                max_cluster_zoom: self.max_cluster_zoom,
            },
            viewport_size: self.viewport_size,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dataset_path = file
            .dataset_path
            .map(PathBuf::from)
            .or_else(|| cli.dataset_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("dataset_path must be specified via --dataset or in config file")
            })?;
        if !dataset_path.exists() {
            bail!("Census dataset does not exist: {:?}", dataset_path);
        }
        if !dataset_path.is_file() {
            bail!("dataset_path is not a file: {:?}", dataset_path);
        }

        let assets_dir = file
            .assets_dir
            .map(PathBuf::from)
            .or_else(|| cli.assets_dir.clone());
        if let Some(dir) = &assets_dir {
            if !dir.is_dir() {
                bail!("assets_dir is not a directory: {:?}", dir);
            }
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let session_idle_timeout_sec = file
            .session_idle_timeout_sec
            .unwrap_or(cli.session_idle_timeout_sec);
        let max_sessions = file.max_sessions.unwrap_or(cli.max_sessions);
        if max_sessions == 0 {
            bail!("max_sessions must be at least 1");
        }

        let map = MapSettings::resolve(file.map.unwrap_or_default())?;

        Ok(Self {
            dataset_path,
            assets_dir,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
            session_idle_timeout_sec,
            max_sessions,
            map,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
