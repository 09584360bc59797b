//! `vecinos nearby`: resolve the position, run the automatic search and
//! render results, optionally followed by an interactive prompt.

mod render;
mod repl;

use std::time::Duration;

use clap::Args;
use vecinos_api::{NearbyApi, VecinosClient};
use vecinos_core::{AppConfig, Coordinates, SearchParameters};
use vecinos_nearby::{
    present, request_position, select_provider, DetailView, FixedPosition,
    NearbySearchController, PositionOptions, SearchOutcome, ViewportManager,
};

use crate::account;
use render::TerminalMap;

#[derive(Debug, Args)]
pub struct NearbyArgs {
    /// Search radius in kilometres (1-50); defaults to `VECINOS_DEFAULT_RADIUS_KM`
    #[arg(long)]
    pub radius: Option<f64>,
    /// Only show providers offering this specialty
    #[arg(long)]
    pub specialty: Option<String>,
    /// Latitude of the current position; overrides `VECINOS_LAT`
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude of the current position; overrides `VECINOS_LNG`
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
    /// Keep a prompt open to adjust the search after the first results
    #[arg(long)]
    pub interactive: bool,
}

pub(crate) async fn run_nearby(
    client: &VecinosClient,
    config: &AppConfig,
    args: NearbyArgs,
) -> anyhow::Result<()> {
    let session = account::resume_session(client, config).await?;

    let radius = args.radius.unwrap_or(config.default_radius_km);
    let params = SearchParameters::new(radius, args.specialty.as_deref())?;

    let position = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(
            Coordinates::new(lat, lng)
                .ok_or_else(|| anyhow::anyhow!("invalid position {lat}, {lng}"))?,
        ),
        _ => config.device_position,
    };
    let options = PositionOptions {
        high_accuracy: true,
        timeout: Duration::from_secs(config.geolocation_timeout_secs),
    };

    let mut screen = NearbyScreen::new(NearbySearchController::new(
        client.clone(),
        session,
        params,
    ));
    screen.render();

    let geolocation = request_position(&FixedPosition::from(position), &options).await;
    if let Some(outcome) = screen.controller.on_geolocation(geolocation).await {
        tracing::debug!(?outcome, "initial search finished");
    }
    screen.render();

    if args.interactive {
        repl::run(&mut screen).await?;
    }
    Ok(())
}

/// The controller plus what is currently drawn for it.
pub(crate) struct NearbyScreen<A> {
    controller: NearbySearchController<A>,
    viewport: ViewportManager,
    map: TerminalMap,
}

impl<A: NearbyApi> NearbyScreen<A> {
    fn new(controller: NearbySearchController<A>) -> Self {
        Self {
            controller,
            viewport: ViewportManager::new(),
            map: TerminalMap::default(),
        }
    }

    /// Prints the map line (when it moved) and the result view.
    fn render(&mut self) {
        let state = self.controller.state();
        let user = self.controller.geolocation().coordinates();
        if let Some(viewport) = self.viewport.update(user, &state) {
            viewport.apply(&mut self.map);
            if let Some(line) = self.map.last() {
                println!("{line}");
            }
        }
        let view = present(&state, &self.controller.parameters());
        println!("{}", render::render_view(&view));
    }

    /// Explicit search: shows the loading view, then the outcome.
    async fn search(&mut self) {
        let Some(ticket) = self.controller.begin_search() else {
            println!("No position available; cannot search.");
            return;
        };
        tracing::debug!(
            generation = ticket.generation(),
            query = ?ticket.query(),
            "search issued"
        );
        self.render();
        if self.controller.run(ticket).await == SearchOutcome::Applied {
            self.render();
        }
    }

    fn show(&self, index: usize) {
        match select_provider(&self.controller.state(), index) {
            Some(event) => println!("{}", render::render_detail(&DetailView::from(&event))),
            None => println!("No result #{}.", index + 1),
        }
    }
}
