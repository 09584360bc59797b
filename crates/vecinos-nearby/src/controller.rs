//! Nearby search state machine.
//!
//! The controller owns the search parameters, the last geolocation outcome
//! and the [`SearchState`], which it publishes through a `tokio::sync::watch`
//! channel. Every search is tagged with a generation number when it is
//! issued; a response is applied only if its generation is still the latest
//! one issued, so an older in-flight search can never overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use vecinos_api::{ApiError, NearbyApi, NearbyQuery, RawProvider};
use vecinos_core::{
    Coordinates, GeolocationState, ParameterError, SearchFailure, SearchParameters, SearchState,
    Session,
};

use crate::normalize::normalize_providers;

/// What happened to a search once its response came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response became the current [`SearchState`].
    Applied,
    /// A newer search was issued meanwhile; the response was discarded.
    Stale,
    /// No search was issued because no device position is available.
    Skipped,
}

/// One issued search: its generation and the exact query to send.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    query: NearbyQuery,
}

impl SearchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn query(&self) -> &NearbyQuery {
        &self.query
    }
}

#[derive(Debug)]
struct Inner {
    geolocation: GeolocationState,
    params: SearchParameters,
    issued: u64,
    auto_searched: bool,
}

pub struct NearbySearchController<A> {
    api: A,
    session: Session,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SearchState>,
}

impl<A: NearbyApi> NearbySearchController<A> {
    #[must_use]
    pub fn new(api: A, session: Session, params: SearchParameters) -> Self {
        let (state_tx, _) = watch::channel(SearchState::Idle);
        Self {
            api,
            session,
            inner: Mutex::new(Inner {
                geolocation: GeolocationState::Pending,
                params,
                issued: 0,
                auto_searched: false,
            }),
            state_tx,
        }
    }

    /// Receiver that observes every state transition, `Loading` included.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    #[must_use]
    pub fn parameters(&self) -> SearchParameters {
        self.lock().params.clone()
    }

    #[must_use]
    pub fn geolocation(&self) -> GeolocationState {
        self.lock().geolocation
    }

    /// Updates the radius for the next search. Does not search by itself.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::RadiusOutOfRange`] and keeps the previous
    /// radius when `radius_km` is out of bounds.
    pub fn set_radius_km(&self, radius_km: f64) -> Result<(), ParameterError> {
        self.lock().params.set_radius_km(radius_km)
    }

    /// Updates the specialty filter for the next search; blank clears it.
    pub fn set_specialty(&self, specialty: &str) {
        self.lock().params.set_specialty(specialty);
    }

    pub fn clear_specialty(&self) {
        self.lock().params.clear_specialty();
    }

    /// Records a geolocation outcome.
    ///
    /// `Unavailable` fails the search state with the cause and discards any
    /// search still in flight. The first transition into `Available` runs the
    /// initial search and returns its outcome; later `Available` updates only
    /// refresh the stored position. After an `Unavailable`, the next
    /// `Available` counts as a first transition again.
    pub async fn on_geolocation(&self, geolocation: GeolocationState) -> Option<SearchOutcome> {
        let ticket = {
            let mut inner = self.lock();
            inner.geolocation = geolocation;
            match geolocation {
                GeolocationState::Pending => return None,
                GeolocationState::Unavailable(cause) => {
                    inner.issued += 1;
                    inner.auto_searched = false;
                    tracing::warn!(%cause, "geolocation unavailable; nearby search disabled");
                    self.state_tx
                        .send_replace(SearchState::Failed(SearchFailure::GeolocationUnavailable {
                            cause,
                        }));
                    return None;
                }
                GeolocationState::Available(coords) => {
                    if inner.auto_searched {
                        return None;
                    }
                    inner.auto_searched = true;
                    self.issue(&mut inner, coords)
                }
            }
        };
        Some(self.run(ticket).await)
    }

    /// Issues a new search with the current parameters and moves to `Loading`.
    ///
    /// Returns `None`, leaving the state untouched, while the device position
    /// is not `Available`.
    pub fn begin_search(&self) -> Option<SearchTicket> {
        let mut inner = self.lock();
        let Some(coords) = inner.geolocation.coordinates() else {
            tracing::debug!(geolocation = ?inner.geolocation, "search skipped: no device position");
            return None;
        };
        Some(self.issue(&mut inner, coords))
    }

    /// Reports the position, then queries nearby providers for `ticket`.
    ///
    /// A failed location report is logged and does not stop the search.
    pub async fn run(&self, ticket: SearchTicket) -> SearchOutcome {
        let credential = &self.session.credential;

        if let Err(error) = self
            .api
            .report_location(credential, ticket.query.coordinates)
            .await
        {
            tracing::warn!(generation = ticket.generation, %error, "location report failed; searching anyway");
        }

        let result = self.api.search_nearby(credential, &ticket.query).await;
        self.complete(&ticket, result)
    }

    /// Applies the response of `ticket` unless a newer search was issued.
    pub fn complete(
        &self,
        ticket: &SearchTicket,
        result: Result<Vec<RawProvider>, ApiError>,
    ) -> SearchOutcome {
        let next = match result {
            Ok(records) => {
                let providers = normalize_providers(records, self.session.user_id.as_ref());
                SearchState::Loaded(Arc::from(providers))
            }
            Err(error) => {
                tracing::warn!(generation = ticket.generation, %error, "nearby search failed");
                SearchState::Failed(SearchFailure::from(error))
            }
        };

        let inner = self.lock();
        if ticket.generation != inner.issued {
            tracing::debug!(
                generation = ticket.generation,
                latest = inner.issued,
                "discarding stale nearby response"
            );
            return SearchOutcome::Stale;
        }
        if let SearchState::Loaded(providers) = &next {
            tracing::info!(generation = ticket.generation, count = providers.len(), "nearby results loaded");
        }
        self.state_tx.send_replace(next);
        SearchOutcome::Applied
    }

    /// Explicit search trigger: begin, run and apply in one call.
    pub async fn search(&self) -> SearchOutcome {
        match self.begin_search() {
            Some(ticket) => self.run(ticket).await,
            None => SearchOutcome::Skipped,
        }
    }

    fn issue(&self, inner: &mut Inner, coordinates: Coordinates) -> SearchTicket {
        inner.issued += 1;
        let ticket = SearchTicket {
            generation: inner.issued,
            query: NearbyQuery {
                coordinates,
                radius_km: inner.params.radius_km(),
                specialty: inner.params.specialty().map(str::to_owned),
            },
        };
        tracing::debug!(
            generation = ticket.generation,
            radius_km = ticket.query.radius_km,
            specialty = ticket.query.specialty.as_deref().unwrap_or(""),
            "issuing nearby search"
        );
        self.state_tx.send_replace(SearchState::Loading);
        ticket
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
