//! Census records to a GeoJSON-shaped feature collection.

use crate::census::{CensusError, CensusRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `[longitude, latitude]`, GeoJSON axis order.
    Point { coordinates: [f64; 2] },
}

impl Geometry {
    pub fn longitude(&self) -> f64 {
        match self {
            Geometry::Point { coordinates } => coordinates[0],
        }
    }

    pub fn latitude(&self) -> f64 {
        match self {
            Geometry::Point { coordinates } => coordinates[1],
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub id: String,
    pub geometry: Geometry,
    pub properties: CensusRecord,
}

impl TryFrom<CensusRecord> for Feature {
    type Error = CensusError;

    fn try_from(record: CensusRecord) -> Result<Self, Self::Error> {
        record.check_geometry()?;
        Ok(Feature {
            id: record.id.clone(),
            geometry: Geometry::Point {
                coordinates: [record.longitude, record.latitude],
            },
            properties: record,
        })
    }
}

/// Immutable snapshot of every encodable record, in load order.
#[derive(Clone, Serialize, Debug, Default)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    features: Vec<Feature>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FeatureCollection {
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.index.get(id).map(|i| &self.features[*i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        let mut features = Vec::new();
        let mut index = HashMap::new();
        for feature in iter {
            if index.contains_key(&feature.id) {
                debug!("Skipping feature with repeated id {}", feature.id);
                continue;
            }
            index.insert(feature.id.clone(), features.len());
            features.push(feature);
        }
        FeatureCollection { features, index }
    }
}

pub struct EncodeResult {
    pub collection: FeatureCollection,
    /// One `InvalidGeometry` per record that was left out.
    pub problems: Vec<CensusError>,
}

/// Order-preserving; a record with bad geometry is excluded, never fatal.
pub fn encode<I: IntoIterator<Item = CensusRecord>>(records: I) -> EncodeResult {
    let mut problems = Vec::new();
    let collection = records
        .into_iter()
        .filter_map(|record| match Feature::try_from(record) {
            Ok(feature) => Some(feature),
            Err(err) => {
                problems.push(err);
                None
            }
        })
        .collect();
    EncodeResult {
        collection,
        problems,
    }
}
