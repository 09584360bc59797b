//! Pure mapping from search state to what the screen shows.
//!
//! [`present`] turns a [`SearchState`] plus the active [`SearchParameters`]
//! into exactly one [`ResultView`]; [`select_provider`] resolves a card click
//! into the event handed to the detail view.

use vecinos_core::{Coordinates, Provider, ProviderId, SearchParameters, SearchState, Specialty};

/// Number of placeholder cards shown while a search is running.
pub const SKELETON_CARDS: usize = 6;

const DEFAULT_DESCRIPTION: &str = "This neighbour has not written a description yet.";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Skeleton {
        cards: usize,
    },
    ErrorBanner {
        message: String,
    },
    Empty {
        title: String,
        hint: String,
    },
    Results {
        header: ResultsHeader,
        cards: Vec<ProviderCard>,
        markers: Vec<MapMarker>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsHeader {
    pub count: usize,
    pub summary: String,
    pub radius_label: String,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCard {
    /// Position in the list, as accepted by [`select_provider`].
    pub index: usize,
    pub provider_id: ProviderId,
    pub name: String,
    pub initial: String,
    pub photo_url: Option<String>,
    pub specialties: Vec<String>,
    pub distance_label: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub provider_id: ProviderId,
    pub position: Coordinates,
    pub popup: String,
}

/// Builds the view for `state`.
///
/// `Idle` renders the loading skeleton as well, since the first search starts
/// as soon as the device position resolves.
#[must_use]
pub fn present(state: &SearchState, params: &SearchParameters) -> ResultView {
    match state {
        SearchState::Idle | SearchState::Loading => ResultView::Skeleton {
            cards: SKELETON_CARDS,
        },
        SearchState::Failed(failure) => ResultView::ErrorBanner {
            message: failure.user_message(),
        },
        SearchState::Loaded(providers) if providers.is_empty() => empty_view(params),
        SearchState::Loaded(providers) => ResultView::Results {
            header: header(providers.len(), params),
            cards: providers
                .iter()
                .enumerate()
                .map(|(index, p)| card(index, p))
                .collect(),
            markers: providers.iter().filter_map(marker).collect(),
        },
    }
}

fn radius_label(radius_km: f64) -> String {
    format!("{radius_km} km")
}

fn header(count: usize, params: &SearchParameters) -> ResultsHeader {
    let radius_label = radius_label(params.radius_km());
    let noun = if count == 1 { "neighbour" } else { "neighbours" };
    let summary = match params.specialty() {
        Some(specialty) => format!("{count} {noun} offering \"{specialty}\" within {radius_label}"),
        None => format!("{count} {noun} within {radius_label}"),
    };
    ResultsHeader {
        count,
        summary,
        radius_label,
        specialty: params.specialty().map(str::to_owned),
    }
}

fn empty_view(params: &SearchParameters) -> ResultView {
    let radius = radius_label(params.radius_km());
    let hint = match params.specialty() {
        Some(specialty) => format!(
            "Nobody offers \"{specialty}\" within {radius}. Try a larger radius or another specialty."
        ),
        None => format!("Nobody is offering services within {radius}. Try a larger radius."),
    };
    ResultView::Empty {
        title: "No neighbours found nearby".to_owned(),
        hint,
    }
}

fn card(index: usize, provider: &Provider) -> ProviderCard {
    ProviderCard {
        index,
        provider_id: provider.id.clone(),
        name: provider.full_name(),
        initial: provider.initial(),
        photo_url: provider.photo_url.clone(),
        specialties: provider.specialty_names.clone(),
        distance_label: provider.distance_label(),
        description: provider.description.clone(),
    }
}

fn marker(provider: &Provider) -> Option<MapMarker> {
    let position = provider.coordinates.filter(Coordinates::is_valid)?;
    let mut popup = provider.full_name();
    if !provider.specialty_names.is_empty() {
        popup.push('\n');
        popup.push_str(&provider.specialty_names.join(", "));
    }
    popup.push('\n');
    popup.push_str(&provider.distance_label());
    Some(MapMarker {
        provider_id: provider.id.clone(),
        position,
        popup,
    })
}

/// Event emitted when a card is selected; carries the full record.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowDetail(pub Provider);

/// Resolves the card at `index` of the loaded list.
#[must_use]
pub fn select_provider(state: &SearchState, index: usize) -> Option<ShowDetail> {
    state
        .providers()?
        .get(index)
        .cloned()
        .map(ShowDetail)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSpecialty {
    pub name: String,
    pub experience: String,
    pub description: Option<String>,
}

/// What the detail view displays for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub full_name: String,
    pub initial: String,
    pub photo_url: Option<String>,
    pub distance_label: String,
    pub description: String,
    pub specialties: Vec<DetailSpecialty>,
    pub phone: Option<String>,
    pub call_link: Option<String>,
    pub whatsapp_link: Option<String>,
}

impl DetailView {
    #[must_use]
    pub fn from_provider(provider: &Provider) -> Self {
        let phone = provider
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        Self {
            full_name: provider.full_name(),
            initial: provider.initial(),
            photo_url: provider.photo_url.clone(),
            distance_label: provider.distance_label(),
            description: provider
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
            specialties: provider.specialties.iter().map(detail_specialty).collect(),
            phone: phone.map(str::to_owned),
            call_link: phone.and_then(call_link),
            whatsapp_link: phone.and_then(whatsapp_link),
        }
    }
}

impl From<&ShowDetail> for DetailView {
    fn from(event: &ShowDetail) -> Self {
        Self::from_provider(&event.0)
    }
}

fn detail_specialty(specialty: &Specialty) -> DetailSpecialty {
    let experience = match specialty.years_experience {
        1 => "1 year of experience".to_owned(),
        n => format!("{n} years of experience"),
    };
    DetailSpecialty {
        name: specialty.name.clone(),
        experience,
        description: specialty.description.clone(),
    }
}

fn digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

fn call_link(phone: &str) -> Option<String> {
    let digits = digits(phone);
    if digits.is_empty() {
        return None;
    }
    let prefix = if phone.starts_with('+') { "+" } else { "" };
    Some(format!("tel:{prefix}{digits}"))
}

fn whatsapp_link(phone: &str) -> Option<String> {
    let digits = digits(phone);
    (!digits.is_empty()).then(|| format!("https://wa.me/{digits}"))
}

#[cfg(test)]
#[path = "presentation_test.rs"]
mod tests;
