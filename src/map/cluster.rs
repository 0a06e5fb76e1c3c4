//! Greedy pixel-radius clustering over a feature collection.

use super::viewport::{project, Bounds, LatLng, PixelPoint, MAX_ZOOM};
use crate::features::FeatureCollection;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterPolicy {
    pub radius_px: f64,
    /// Zooms strictly above this one show every feature on its own.
    pub max_cluster_zoom: u8,
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        ClusterPolicy {
            radius_px: 50.0,
            max_cluster_zoom: 18,
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapMarker {
    Feature {
        id: String,
        position: LatLng,
    },
    Cluster {
        id: String,
        center: LatLng,
        count: usize,
        bounds: Bounds,
        member_ids: Vec<String>,
    },
}

impl MapMarker {
    pub fn id(&self) -> &str {
        match self {
            MapMarker::Feature { id, .. } | MapMarker::Cluster { id, .. } => id,
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct ClusterState {
    pub zoom: u8,
    pub radius_px: f64,
    pub markers: Vec<MapMarker>,
}

impl ClusterState {
    pub fn cluster(&self, id: &str) -> Option<&MapMarker> {
        self.markers
            .iter()
            .find(|m| matches!(m, MapMarker::Cluster { .. }) && m.id() == id)
    }

    pub fn cluster_count(&self) -> usize {
        self.markers
            .iter()
            .filter(|m| matches!(m, MapMarker::Cluster { .. }))
            .count()
    }
}

pub fn cluster_id(zoom: u8, seed_id: &str) -> String {
    format!("cluster:{}:{}", zoom, seed_id)
}

type Cell = (i64, i64);

fn cell_of(point: &PixelPoint, cell_size: f64) -> Cell {
    (
        (point.x / cell_size).floor() as i64,
        (point.y / cell_size).floor() as i64,
    )
}

/// Groups `features` as they would appear at `zoom`.
///
/// Walks features in collection order. The first unassigned feature seeds a
/// group and claims every later unassigned feature closer than the radius.
/// Candidates come from a grid with cells one radius wide, so only the 3x3
/// neighbourhood of the seed's cell is searched.
pub fn cluster_features(features: &FeatureCollection, zoom: u8, policy: &ClusterPolicy) -> ClusterState {
    let zoom = zoom.min(MAX_ZOOM);
    let all = features.features();
    let positions: Vec<LatLng> = all
        .iter()
        .map(|f| LatLng::new(f.geometry.latitude(), f.geometry.longitude()))
        .collect();

    let clustering = zoom <= policy.max_cluster_zoom && policy.radius_px > 0.0;
    if !clustering {
        return ClusterState {
            zoom,
            radius_px: policy.radius_px,
            markers: all
                .iter()
                .zip(&positions)
                .map(|(f, p)| MapMarker::Feature {
                    id: f.id.clone(),
                    position: *p,
                })
                .collect(),
        };
    }

    let pixels: Vec<PixelPoint> = positions.iter().map(|p| project(*p, zoom)).collect();
    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    for (i, pixel) in pixels.iter().enumerate() {
        grid.entry(cell_of(pixel, policy.radius_px)).or_default().push(i);
    }

    let mut assigned = vec![false; all.len()];
    let mut markers = Vec::new();
    for seed in 0..all.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];

        let (cx, cy) = cell_of(&pixels[seed], policy.radius_px);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(bucket) = grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &candidate in bucket {
                    if candidate > seed
                        && !assigned[candidate]
                        && pixels[seed].distance(&pixels[candidate]) < policy.radius_px
                    {
                        assigned[candidate] = true;
                        members.push(candidate);
                    }
                }
            }
        }
        members.sort_unstable();

        if members.len() == 1 {
            markers.push(MapMarker::Feature {
                id: all[seed].id.clone(),
                position: positions[seed],
            });
            continue;
        }

        let mut bounds = Bounds::around(positions[seed]);
        let (mut lat_sum, mut lon_sum) = (0.0, 0.0);
        for &m in &members {
            bounds.extend(positions[m]);
            lat_sum += positions[m].lat;
            lon_sum += positions[m].lon;
        }
        let count = members.len();
        markers.push(MapMarker::Cluster {
            id: cluster_id(zoom, &all[seed].id),
            center: LatLng::new(lat_sum / count as f64, lon_sum / count as f64),
            count,
            bounds,
            member_ids: members.iter().map(|&m| all[m].id.clone()).collect(),
        });
    }

    ClusterState {
        zoom,
        radius_px: policy.radius_px,
        markers,
    }
}
