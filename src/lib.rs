//! SQURL census map server library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod audio;
pub mod census;
pub mod config;
pub mod detail;
pub mod features;
pub mod map;
pub mod server;

// Re-export commonly used types for convenience
pub use census::{load_census, CensusError};
pub use server::{make_app, run_server, LoadedCensus, RequestsLoggingLevel, ServerConfig};
