//! Shared constants for end-to-end tests
//!
//! When the census fixture changes, update only this file.

// ============================================================================
// Census Fixture IDs
// ============================================================================

/// Adult gray squirrel up a tree, part of the three-squirrel cluster
pub const CLUSTERED_ADULT_ID: &str = "1A-PM-1014-01";

/// Juvenile cinnamon squirrel on the ground, part of the cluster
pub const CLUSTERED_JUVENILE_ID: &str = "1A-PM-1014-02";

/// Black squirrel with unknown age and location, part of the cluster
pub const CLUSTERED_UNKNOWN_ID: &str = "1A-PM-1014-03";

/// Squirrel far enough from the others to never cluster with them
pub const LONE_SQUIRREL_ID: &str = "9Z-AM-1017-05";

/// Rows that survive loading
pub const CENSUS_RECORD_COUNT: usize = 4;

/// Rows dropped while loading (one row has no longitude)
pub const CENSUS_DROPPED_ROWS: usize = 1;

/// Zoom a fresh session starts at
pub const DEFAULT_ZOOM: u8 = 15;

// ============================================================================
// Timeouts
// ============================================================================

/// How long to wait for the server to answer its first request
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Per-request timeout of the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delay between readiness probes
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
