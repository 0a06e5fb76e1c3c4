mod cluster;
mod presenter;
mod viewport;

pub use cluster::{cluster_features, cluster_id, ClusterPolicy, ClusterState, MapMarker};
pub use presenter::{ClickOutcome, ClickTarget, MapPresenter, PresenterSettings};
pub use viewport::{project, Bounds, LatLng, PixelPoint, Viewport, ViewportSize, MAX_ZOOM, MIN_ZOOM};
