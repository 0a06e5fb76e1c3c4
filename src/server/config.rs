use super::{RequestsLoggingLevel, DEFAULT_MAX_SESSIONS};
use crate::config::{AppConfig, MapSettings};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    pub assets_dir_path: Option<String>,
    /// Sessions untouched for longer than this are dropped on the next create.
    pub session_idle_timeout_sec: u64,
    pub max_sessions: usize,
    pub map: MapSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8050,
            metrics_port: 9092,
            content_cache_age_sec: 3600,
            frontend_dir_path: None,
            assets_dir_path: None,
            session_idle_timeout_sec: 3600,
            max_sessions: DEFAULT_MAX_SESSIONS,
            map: MapSettings::default(),
        }
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            metrics_port: config.metrics_port,
            content_cache_age_sec: config.content_cache_age_sec,
            frontend_dir_path: config.frontend_dir_path.clone(),
            assets_dir_path: config
                .assets_dir
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            session_idle_timeout_sec: config.session_idle_timeout_sec,
            max_sessions: config.max_sessions,
            map: config.map.clone(),
        }
    }
}
