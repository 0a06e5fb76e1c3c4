use super::cluster::{cluster_features, ClusterPolicy, ClusterState, MapMarker};
use super::viewport::{Bounds, LatLng, Viewport, ViewportSize, MAX_ZOOM};
use crate::features::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the host map reports the user clicked on.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClickTarget {
    Feature { id: String },
    Cluster { id: String },
    Empty,
}

impl ClickTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ClickTarget::Feature { .. } => "feature",
            ClickTarget::Cluster { .. } => "cluster",
            ClickTarget::Empty => "empty",
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickOutcome {
    ZoomToBounds {
        bounds: Bounds,
        center: LatLng,
        zoom: u8,
    },
    Selected {
        id: String,
    },
    Cleared,
    /// A cluster id that is not in the current grouping, usually a click on a
    /// marker drawn before the last zoom change.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresenterSettings {
    pub policy: ClusterPolicy,
    pub viewport_size: ViewportSize,
}

/// Per-session map state: viewport, derived clusters and selection.
#[derive(Debug)]
pub struct MapPresenter {
    features: Arc<FeatureCollection>,
    settings: PresenterSettings,
    viewport: Viewport,
    clusters: ClusterState,
    selection: Option<String>,
}

impl MapPresenter {
    pub fn new(
        features: Arc<FeatureCollection>,
        settings: PresenterSettings,
        initial: Viewport,
    ) -> MapPresenter {
        let viewport = Viewport::new(initial.center, initial.zoom);
        let clusters = cluster_features(&features, viewport.zoom, &settings.policy);
        MapPresenter {
            features,
            settings,
            viewport,
            clusters,
            selection: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clusters(&self) -> &ClusterState {
        &self.clusters
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selected_feature(&self) -> Option<&Feature> {
        self.selection.as_deref().and_then(|id| self.features.get(id))
    }

    /// Clusters only depend on zoom, so a pan keeps the current grouping.
    pub fn set_viewport(&mut self, center: LatLng, zoom: u8) -> &ClusterState {
        let viewport = Viewport::new(center, zoom);
        if viewport.zoom != self.clusters.zoom {
            self.clusters = cluster_features(&self.features, viewport.zoom, &self.settings.policy);
        }
        self.viewport = viewport;
        &self.clusters
    }

    pub fn on_marker_click(&mut self, target: &ClickTarget) -> ClickOutcome {
        match target {
            ClickTarget::Cluster { id } => match self.clusters.cluster(id) {
                Some(MapMarker::Cluster { bounds, .. }) => {
                    let fit = bounds.fit_zoom(self.settings.viewport_size, MAX_ZOOM);
                    let deeper = self.viewport.zoom.saturating_add(1).min(MAX_ZOOM);
                    ClickOutcome::ZoomToBounds {
                        bounds: *bounds,
                        center: bounds.center(),
                        zoom: fit.max(deeper),
                    }
                }
                _ => ClickOutcome::Ignored,
            },
            ClickTarget::Feature { id } if self.features.contains(id) => {
                self.selection = Some(id.clone());
                ClickOutcome::Selected { id: id.clone() }
            }
            ClickTarget::Feature { .. } | ClickTarget::Empty => self.clear(),
        }
    }

    fn clear(&mut self) -> ClickOutcome {
        self.selection = None;
        ClickOutcome::Cleared
    }
}
