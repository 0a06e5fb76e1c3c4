//! Symbolic asset keys to files, and the sound clips inlined as data URIs.

use crate::audio::SoundChannel;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{info, warn};

pub const ASSETS_URL_PREFIX: &str = "/assets";

/// Badges without artwork of their own reuse the squirrel portrait.
const PLACEHOLDER_ICON: &str = "squ2.png";

const ASSET_TABLE: &[(&str, &str)] = &[
    ("age:Adult", "squ2.png"),
    ("age:Juvenile", "squ1.jpg"),
    ("age:Unknown", "squ22.png"),
    ("elevation:GroundPlane", "bush.png"),
    ("elevation:AboveGround", "tree2.png"),
    ("elevation:Unknown", "squirrel.png"),
    ("marker:squirrel", "map_marker.png"),
    ("header:logo", "squ2.png"),
];

const PLACEHOLDER_KEYS: &[&str] = &[
    "color:Gray",
    "color:Cinnamon",
    "color:Black",
    "color:White",
    "activity:Running",
    "activity:Chasing",
    "activity:Climbing",
    "activity:Eating",
    "activity:Foraging",
    "interaction:TailFlags",
    "interaction:TailTwitches",
    "interaction:Approaches",
    "interaction:Indifferent",
    "interaction:RunsFrom",
];

pub fn asset_file(key: &str) -> Option<&'static str> {
    if let Some((_, file)) = ASSET_TABLE.iter().find(|(k, _)| *k == key) {
        return Some(*file);
    }
    if let Some(channel) = SoundChannel::ALL.iter().find(|c| c.key() == key) {
        return Some(channel.clip_file());
    }
    PLACEHOLDER_KEYS
        .contains(&key)
        .then_some(PLACEHOLDER_ICON)
}

/// Every known key mapped to the URL it is served at.
pub fn asset_manifest() -> BTreeMap<&'static str, String> {
    let sound_keys = SoundChannel::ALL.iter().map(|c| c.key());
    ASSET_TABLE
        .iter()
        .map(|(k, _)| *k)
        .chain(sound_keys)
        .chain(PLACEHOLDER_KEYS.iter().copied())
        .filter_map(|key| {
            asset_file(key).map(|file| (key, format!("{}/{}", ASSETS_URL_PREFIX, file)))
        })
        .collect()
}

/// Clips read once at startup; a channel without a clip still toggles.
#[derive(Debug, Default)]
pub struct SoundClips {
    data_uris: HashMap<SoundChannel, String>,
}

impl SoundClips {
    pub fn load(assets_dir: Option<&Path>) -> SoundClips {
        let Some(dir) = assets_dir else {
            info!("No assets dir configured, sound clips will not be inlined");
            return SoundClips::default();
        };

        let mut data_uris = HashMap::new();
        for channel in SoundChannel::ALL {
            let path = dir.join(channel.clip_file());
            match std::fs::read(&path) {
                Ok(bytes) => {
                    info!("Loaded {} clip from {:?} ({} bytes)", channel, path, bytes.len());
                    data_uris.insert(channel, data_uri(&bytes));
                }
                Err(err) => warn!("Could not read {} clip at {:?}: {}", channel, path, err),
            }
        }
        SoundClips { data_uris }
    }

    pub fn data_uri(&self, channel: SoundChannel) -> Option<&str> {
        self.data_uris.get(&channel).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data_uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_uris.is_empty()
    }
}

fn data_uri(bytes: &[u8]) -> String {
    let mime = match infer::get(bytes) {
        Some(kind) => kind.mime_type(),
        None => {
            warn!("Could not detect clip type, serving as octet-stream");
            "application/octet-stream"
        }
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
