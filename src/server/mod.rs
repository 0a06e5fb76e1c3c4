pub mod assets;
pub mod config;
mod http_layers;
pub mod metrics;
pub mod server;
pub(self) mod session;
mod session_store;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use session_store::{MapSession, SessionStore, DEFAULT_MAX_SESSIONS};
pub use state::LoadedCensus;
