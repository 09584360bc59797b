//! Map viewport computation.
//!
//! The map shows either a single point at a fixed zoom or the bounding box of
//! the user plus every result that has a valid position. The
//! [`ViewportManager`] recomputes only when the user's position first becomes
//! known or a new result list replaces the old one.

use std::sync::Arc;

use vecinos_core::{Coordinates, Provider, SearchState};

pub const DEFAULT_ZOOM: u8 = 14;
pub const MAX_FIT_ZOOM: u8 = 15;
pub const FIT_PADDING_PX: u32 = 100;
/// Points closer than this in both axes are treated as one location.
pub const COINCIDENT_EPSILON_DEG: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl BoundingBox {
    /// Smallest box enclosing every point, or `None` for an empty set.
    #[must_use]
    pub fn from_points(points: &[Coordinates]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let init = Self {
            south_west: *first,
            north_east: *first,
        };
        Some(rest.iter().fold(init, |bbox, p| Self {
            south_west: Coordinates {
                lat: bbox.south_west.lat.min(p.lat),
                lng: bbox.south_west.lng.min(p.lng),
            },
            north_east: Coordinates {
                lat: bbox.north_east.lat.max(p.lat),
                lng: bbox.north_east.lng.max(p.lng),
            },
        }))
    }

    #[must_use]
    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    /// `(lat_span, lng_span)` in degrees.
    #[must_use]
    pub fn spans(&self) -> (f64, f64) {
        (
            self.north_east.lat - self.south_west.lat,
            self.north_east.lng - self.south_west.lng,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Centered {
        center: Coordinates,
        zoom: u8,
    },
    Fitted {
        bounds: BoundingBox,
        padding_px: u32,
        max_zoom: u8,
    },
}

impl Viewport {
    /// Sends this viewport to a map widget.
    pub fn apply<M: MapSurface + ?Sized>(&self, map: &mut M) {
        match *self {
            Self::Centered { center, zoom } => map.set_view(center, zoom),
            Self::Fitted {
                bounds,
                padding_px,
                max_zoom,
            } => map.fit_bounds(bounds, padding_px, max_zoom),
        }
    }
}

/// The two operations the workflow needs from a map widget.
pub trait MapSurface {
    fn set_view(&mut self, center: Coordinates, zoom: u8);
    fn fit_bounds(&mut self, bounds: BoundingBox, padding_px: u32, max_zoom: u8);
}

/// Viewport for the user's position plus the given result positions.
///
/// `None` and invalid result positions are ignored. One point, or a set whose
/// points all coincide, yields a centered view on the user.
#[must_use]
pub fn compute_viewport<I>(user: Coordinates, results: I) -> Viewport
where
    I: IntoIterator<Item = Option<Coordinates>>,
{
    let mut points = vec![user];
    points.extend(results.into_iter().flatten().filter(Coordinates::is_valid));

    let coincident = points
        .iter()
        .all(|p| p.within(&user, COINCIDENT_EPSILON_DEG));
    if coincident {
        return Viewport::Centered {
            center: user,
            zoom: DEFAULT_ZOOM,
        };
    }

    match BoundingBox::from_points(&points) {
        Some(bounds) => Viewport::Fitted {
            bounds,
            padding_px: FIT_PADDING_PX,
            max_zoom: MAX_FIT_ZOOM,
        },
        None => Viewport::Centered {
            center: user,
            zoom: DEFAULT_ZOOM,
        },
    }
}

/// Tracks which inputs the current viewport was computed from.
#[derive(Debug, Default)]
pub struct ViewportManager {
    user: Option<Coordinates>,
    results: Option<Arc<[Provider]>>,
}

impl ViewportManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new viewport when it has to move, `None` otherwise.
    ///
    /// The map moves when the user's position first becomes known and
    /// whenever `state` carries a result list other than the one last used.
    /// Re-rendering with the same list does nothing.
    pub fn update(&mut self, user: Option<Coordinates>, state: &SearchState) -> Option<Viewport> {
        let user = user.filter(Coordinates::is_valid)?;
        let first_fix = self.user.is_none();
        self.user = Some(user);

        let new_results = match (state.providers(), &self.results) {
            (Some(next), Some(prev)) => !Arc::ptr_eq(next, prev),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if new_results {
            self.results = state.providers().cloned();
        }
        if !first_fix && !new_results {
            return None;
        }

        let viewport = match &self.results {
            Some(providers) => compute_viewport(user, providers.iter().map(|p| p.coordinates)),
            None => compute_viewport(user, std::iter::empty()),
        };
        tracing::debug!(?viewport, first_fix, new_results, "map viewport recomputed");
        Some(viewport)
    }
}
