//! Nearby-search workflow: device position, search controller, map viewport
//! and result presentation.

pub mod controller;
pub mod geolocation;
pub mod normalize;
pub mod presentation;
pub mod viewport;

pub use controller::{NearbySearchController, SearchOutcome, SearchTicket};
pub use geolocation::{request_position, FixedPosition, PositionOptions, PositionSource};
pub use normalize::normalize_providers;
pub use presentation::{
    present, select_provider, DetailView, MapMarker, ProviderCard, ResultView, ResultsHeader,
    ShowDetail,
};
pub use viewport::{compute_viewport, BoundingBox, MapSurface, Viewport, ViewportManager};
