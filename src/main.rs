use anyhow::Result;
use clap::Parser;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use squrl_server::config;
use squrl_server::server::assets::SoundClips;
use squrl_server::server::{
    metrics, run_server, LoadedCensus, RequestsLoggingLevel, ServerConfig, DEFAULT_MAX_SESSIONS,
};
use squrl_server::load_census;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the squirrel census CSV export.
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub dataset: Option<PathBuf>,

    /// Directory with icons and sound clips, served under /assets.
    #[clap(long, value_parser = parse_path)]
    pub assets_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8050)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9092)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// The maximum age of cached map content in seconds.
    #[clap(long, default_value_t = 3600)]
    pub content_cache_age_sec: usize,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Map sessions idle for longer than this many seconds are dropped.
    #[clap(long, default_value_t = 3600)]
    pub session_idle_timeout_sec: u64,

    /// Maximum number of live map sessions; the least recently used is evicted.
    #[clap(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            dataset_path: args.dataset.clone(),
            assets_dir: args.assets_dir.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            content_cache_age_sec: args.content_cache_age_sec,
            frontend_dir_path: args.frontend_dir_path.clone(),
            session_idle_timeout_sec: args.session_idle_timeout_sec,
            max_sessions: args.max_sessions,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  dataset: {:?}", app_config.dataset_path);
    info!("  assets_dir: {:?}", app_config.assets_dir);
    info!("  port: {}", app_config.port);

    let dataset = load_census(&app_config.dataset_path)?;

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::init_census_metrics(dataset.records.len(), dataset.dropped_rows);

    let census = LoadedCensus::from_dataset(dataset);
    let sound_clips = SoundClips::load(app_config.assets_dir.as_deref());

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);
    run_server(ServerConfig::from(&app_config), census, sound_clips).await
}
