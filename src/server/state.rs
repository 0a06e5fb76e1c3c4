use axum::extract::FromRef;

use crate::census::{CensusDataset, DatasetSummary};
use crate::features::{encode, FeatureCollection};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::assets::SoundClips;
use super::session_store::SessionStore;
use super::ServerConfig;

/// The dataset as it was loaded at startup, never mutated afterwards.
#[derive(Debug)]
pub struct LoadedCensus {
    pub features: Arc<FeatureCollection>,
    pub summary: DatasetSummary,
}

impl LoadedCensus {
    pub fn from_dataset(dataset: CensusDataset) -> LoadedCensus {
        let summary = DatasetSummary::of(&dataset);
        let encoded = encode(dataset.records);
        for problem in &encoded.problems {
            warn!("Record left off the map: {}", problem);
        }
        info!("Encoded {} map features", encoded.collection.len());

        LoadedCensus {
            features: Arc::new(encoded.collection),
            summary,
        }
    }
}

pub type GuardedCensus = Arc<LoadedCensus>;
pub type GuardedSessionStore = Arc<SessionStore>;
pub type GuardedSoundClips = Arc<SoundClips>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub census: GuardedCensus,
    pub sessions: GuardedSessionStore,
    pub sound_clips: GuardedSoundClips,
    pub hash: String,
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedCensus {
    fn from_ref(input: &ServerState) -> Self {
        input.census.clone()
    }
}

impl FromRef<ServerState> for GuardedSessionStore {
    fn from_ref(input: &ServerState) -> Self {
        input.sessions.clone()
    }
}

impl FromRef<ServerState> for GuardedSoundClips {
    fn from_ref(input: &ServerState) -> Self {
        input.sound_clips.clone()
    }
}
