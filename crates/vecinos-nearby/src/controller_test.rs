use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::oneshot;
use vecinos_core::{
    Credential, GeolocationError, NetworkFailure, ProviderId, SearchFailure,
};

use super::*;

type NearbyResult = Result<Vec<RawProvider>, ApiError>;

fn session(own_id: &str) -> Session {
    Session::new(
        Credential::new("test-token").unwrap(),
        Some(ProviderId::from(own_id)),
    )
}

fn here() -> Coordinates {
    Coordinates {
        lat: 4.60,
        lng: -74.08,
    }
}

fn record(id: &str) -> RawProvider {
    serde_json::from_value(json!({
        "id": id,
        "nombre": format!("Vecino {id}"),
        "lat": 4.61,
        "lng": -74.07,
        "distance_m": 1200,
        "especialidades": [{ "especialidad": "Plomero", "experiencia": 4 }]
    }))
    .unwrap()
}

fn loaded_ids(state: &SearchState) -> Vec<String> {
    state
        .providers()
        .expect("state should be Loaded")
        .iter()
        .map(|p| p.id.to_string())
        .collect()
}

// -----------------------------------------------------------------------
// Fakes
// -----------------------------------------------------------------------

/// Answers immediately from a queue of scripted responses and records
/// every call.
#[derive(Default)]
struct RecordingApi {
    reports: AtomicUsize,
    queries: Mutex<Vec<NearbyQuery>>,
    responses: Mutex<VecDeque<NearbyResult>>,
    fail_reports: bool,
}

impl RecordingApi {
    fn with_responses(responses: Vec<NearbyResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    fn searches(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    fn last_query(&self) -> NearbyQuery {
        self.queries.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl NearbyApi for RecordingApi {
    async fn report_location(
        &self,
        _credential: &Credential,
        _coordinates: Coordinates,
    ) -> Result<(), ApiError> {
        self.reports.fetch_add(1, Ordering::SeqCst);
        if self.fail_reports {
            return Err(ApiError::Status {
                status: 500,
                url: "http://test/users/location".to_owned(),
                message: Some("db down".to_owned()),
            });
        }
        Ok(())
    }

    async fn search_nearby(
        &self,
        _credential: &Credential,
        query: &NearbyQuery,
    ) -> Result<Vec<RawProvider>, ApiError> {
        self.queries.lock().unwrap().push(query.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Holds each search open until the test releases it, so responses can be
/// delivered in any order.
struct GatedApi {
    calls: AtomicUsize,
    gates: Mutex<VecDeque<oneshot::Receiver<NearbyResult>>>,
}

impl GatedApi {
    fn new(gates: Vec<oneshot::Receiver<NearbyResult>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gates: Mutex::new(gates.into()),
        }
    }

    async fn wait_for_calls(&self, n: usize) {
        while self.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl NearbyApi for GatedApi {
    async fn report_location(
        &self,
        _credential: &Credential,
        _coordinates: Coordinates,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn search_nearby(
        &self,
        _credential: &Credential,
        _query: &NearbyQuery,
    ) -> Result<Vec<RawProvider>, ApiError> {
        let gate = self.gates.lock().unwrap().pop_front().unwrap();
        self.calls.fetch_add(1, Ordering::SeqCst);
        gate.await.unwrap()
    }
}

// -----------------------------------------------------------------------
// Geolocation gating
// -----------------------------------------------------------------------

#[tokio::test]
async fn starts_idle_with_pending_geolocation() {
    let controller =
        NearbySearchController::new(RecordingApi::default(), session("7"), SearchParameters::default());
    assert_eq!(controller.state(), SearchState::Idle);
    assert_eq!(controller.geolocation(), GeolocationState::Pending);
}

#[tokio::test]
async fn unavailable_geolocation_issues_no_requests() {
    let api = Arc::new(RecordingApi::default());
    let controller =
        NearbySearchController::new(Arc::clone(&api), session("7"), SearchParameters::default());

    let outcome = controller
        .on_geolocation(GeolocationState::Unavailable(GeolocationError::PermissionDenied))
        .await;
    assert!(outcome.is_none());
    assert_eq!(controller.search().await, SearchOutcome::Skipped);
    assert!(controller.begin_search().is_none());

    assert_eq!(api.searches(), 0);
    assert_eq!(api.reports.load(Ordering::SeqCst), 0);
    assert_eq!(
        controller.state(),
        SearchState::Failed(SearchFailure::GeolocationUnavailable {
            cause: GeolocationError::PermissionDenied
        })
    );
}

#[tokio::test]
async fn pending_geolocation_skips_search() {
    let api = Arc::new(RecordingApi::default());
    let controller =
        NearbySearchController::new(Arc::clone(&api), session("7"), SearchParameters::default());

    assert!(controller.on_geolocation(GeolocationState::Pending).await.is_none());
    assert_eq!(controller.search().await, SearchOutcome::Skipped);
    assert_eq!(api.searches(), 0);
    assert_eq!(controller.state(), SearchState::Idle);
}

#[tokio::test]
async fn first_available_position_triggers_one_automatic_search() {
    let api = Arc::new(RecordingApi::with_responses(vec![Ok(vec![record("1")])]));
    let controller =
        NearbySearchController::new(Arc::clone(&api), session("7"), SearchParameters::default());

    let outcome = controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;
    assert_eq!(outcome, Some(SearchOutcome::Applied));
    assert_eq!(loaded_ids(&controller.state()), vec!["1"]);

    let again = controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;
    assert!(again.is_none());
    assert_eq!(api.searches(), 1);
    assert_eq!(api.reports.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn available_after_unavailable_searches_again() {
    let api = Arc::new(RecordingApi::default());
    let controller =
        NearbySearchController::new(Arc::clone(&api), session("7"), SearchParameters::default());

    controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;
    controller
        .on_geolocation(GeolocationState::Unavailable(GeolocationError::Timeout))
        .await;
    let retried = controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;

    assert_eq!(retried, Some(SearchOutcome::Applied));
    assert_eq!(api.searches(), 2);
}

// -----------------------------------------------------------------------
// Parameters and processing
// -----------------------------------------------------------------------

#[tokio::test]
async fn query_reflects_current_parameters() {
    let api = Arc::new(RecordingApi::default());
    let controller =
        NearbySearchController::new(Arc::clone(&api), session("7"), SearchParameters::default());
    controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;

    controller.set_radius_km(25.0).unwrap();
    controller.set_specialty("  plomero ");
    assert_eq!(api.searches(), 1, "changing parameters must not search by itself");

    controller.search().await;
    let query = api.last_query();
    assert_eq!(query.coordinates, here());
    assert!((query.radius_km - 25.0).abs() < f64::EPSILON);
    assert_eq!(query.specialty.as_deref(), Some("plomero"));

    controller.clear_specialty();
    controller.search().await;
    assert!(api.last_query().specialty.is_none());
}

#[tokio::test]
async fn out_of_range_radius_is_rejected_and_previous_kept() {
    let controller =
        NearbySearchController::new(RecordingApi::default(), session("7"), SearchParameters::default());
    assert!(controller.set_radius_km(80.0).is_err());
    assert!((controller.parameters().radius_km() - vecinos_core::DEFAULT_RADIUS_KM).abs() < f64::EPSILON);
}

#[tokio::test]
async fn failed_location_report_does_not_block_search() {
    let api = Arc::new(RecordingApi {
        fail_reports: true,
        responses: Mutex::new(vec![Ok(vec![record("3")])].into()),
        ..RecordingApi::default()
    });
    let controller =
        NearbySearchController::new(Arc::clone(&api), session("7"), SearchParameters::default());

    let outcome = controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;

    assert_eq!(outcome, Some(SearchOutcome::Applied));
    assert_eq!(api.reports.load(Ordering::SeqCst), 1);
    assert_eq!(loaded_ids(&controller.state()), vec!["3"]);
}

#[tokio::test]
async fn server_error_fails_with_status() {
    let api = RecordingApi::with_responses(vec![Err(ApiError::Status {
        status: 503,
        url: "http://test/users/nearby".to_owned(),
        message: None,
    })]);
    let controller = NearbySearchController::new(api, session("7"), SearchParameters::default());

    controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;

    assert_eq!(
        controller.state(),
        SearchState::Failed(SearchFailure::NetworkFailure(NetworkFailure::Status(503)))
    );
}

#[tokio::test]
async fn rejected_token_fails_unauthenticated() {
    let api = RecordingApi::with_responses(vec![Err(ApiError::Unauthenticated { status: 401 })]);
    let controller = NearbySearchController::new(api, session("7"), SearchParameters::default());

    controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;

    assert_eq!(
        controller.state(),
        SearchState::Failed(SearchFailure::Unauthenticated)
    );
}

#[tokio::test]
async fn own_user_is_excluded_from_results() {
    let api = RecordingApi::with_responses(vec![Ok(vec![record("1"), record("7"), record("9")])]);
    let controller = NearbySearchController::new(api, session("7"), SearchParameters::default());

    controller
        .on_geolocation(GeolocationState::Available(here()))
        .await;

    assert_eq!(loaded_ids(&controller.state()), vec!["1", "9"]);
}

#[tokio::test]
async fn subscribers_observe_loading_before_results() {
    let controller =
        NearbySearchController::new(RecordingApi::default(), session("7"), SearchParameters::default());
    let mut rx = controller.subscribe();
    controller
        .on_geolocation(GeolocationState::Pending)
        .await;

    {
        let mut inner = controller.lock();
        inner.geolocation = GeolocationState::Available(here());
    }
    let ticket = controller.begin_search().unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_loading());

    controller.complete(&ticket, Ok(vec![record("5")]));
    assert!(rx.has_changed().unwrap());
    assert_eq!(loaded_ids(&rx.borrow_and_update()), vec!["5"]);
}

// -----------------------------------------------------------------------
// Latest-wins ordering
// -----------------------------------------------------------------------

#[tokio::test]
async fn older_response_arriving_last_is_discarded() {
    let controller =
        NearbySearchController::new(RecordingApi::default(), session("7"), SearchParameters::default());
    controller.lock().geolocation = GeolocationState::Available(here());

    let first = controller.begin_search().unwrap();
    let second = controller.begin_search().unwrap();
    assert!(second.generation() > first.generation());

    assert_eq!(
        controller.complete(&second, Ok(vec![record("2")])),
        SearchOutcome::Applied
    );
    assert_eq!(
        controller.complete(&first, Ok(vec![record("1")])),
        SearchOutcome::Stale
    );
    assert_eq!(loaded_ids(&controller.state()), vec!["2"]);
}

#[tokio::test]
async fn older_failure_does_not_overwrite_newer_results() {
    let controller =
        NearbySearchController::new(RecordingApi::default(), session("7"), SearchParameters::default());
    controller.lock().geolocation = GeolocationState::Available(here());

    let first = controller.begin_search().unwrap();
    let second = controller.begin_search().unwrap();
    controller.complete(&second, Ok(vec![record("2")]));
    let outcome = controller.complete(
        &first,
        Err(ApiError::Status {
            status: 500,
            url: "http://test/users/nearby".to_owned(),
            message: None,
        }),
    );

    assert_eq!(outcome, SearchOutcome::Stale);
    assert_eq!(loaded_ids(&controller.state()), vec!["2"]);
}

#[tokio::test]
async fn newer_response_arriving_first_wins_over_concurrent_older_one() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let api = Arc::new(GatedApi::new(vec![first_rx, second_rx]));
    let controller = Arc::new(NearbySearchController::new(
        Arc::clone(&api),
        session("7"),
        SearchParameters::default(),
    ));

    let c1 = Arc::clone(&controller);
    let first = tokio::spawn(async move {
        c1.on_geolocation(GeolocationState::Available(here()))
            .await
    });
    api.wait_for_calls(1).await;

    let c2 = Arc::clone(&controller);
    let second = tokio::spawn(async move { c2.search().await });
    api.wait_for_calls(2).await;
    assert!(controller.state().is_loading());

    second_tx.send(Ok(vec![record("2")])).unwrap();
    assert_eq!(second.await.unwrap(), SearchOutcome::Applied);

    first_tx.send(Ok(vec![record("1")])).unwrap();
    assert_eq!(first.await.unwrap(), Some(SearchOutcome::Stale));

    assert_eq!(loaded_ids(&controller.state()), vec!["2"]);
}

#[tokio::test]
async fn unavailable_geolocation_discards_in_flight_search() {
    let controller =
        NearbySearchController::new(RecordingApi::default(), session("7"), SearchParameters::default());
    controller.lock().geolocation = GeolocationState::Available(here());
    let ticket = controller.begin_search().unwrap();

    controller
        .on_geolocation(GeolocationState::Unavailable(GeolocationError::PositionUnavailable))
        .await;

    assert_eq!(
        controller.complete(&ticket, Ok(vec![record("1")])),
        SearchOutcome::Stale
    );
    assert!(matches!(
        controller.state(),
        SearchState::Failed(SearchFailure::GeolocationUnavailable { .. })
    ));
}
