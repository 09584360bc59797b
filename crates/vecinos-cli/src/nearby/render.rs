//! Plain-text rendering of the nearby views.

use std::fmt::Write as _;

use vecinos_core::Coordinates;
use vecinos_nearby::{BoundingBox, DetailView, MapSurface, ResultView};

/// Map surface that describes the requested view as one line of text.
#[derive(Debug, Default)]
pub(crate) struct TerminalMap {
    last: Option<String>,
}

impl TerminalMap {
    pub(crate) fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl MapSurface for TerminalMap {
    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.last = Some(format!("[map] centered on {center} (zoom {zoom})"));
    }

    fn fit_bounds(&mut self, bounds: BoundingBox, padding_px: u32, max_zoom: u8) {
        self.last = Some(format!(
            "[map] showing {} to {} (padding {padding_px}px, max zoom {max_zoom})",
            bounds.south_west, bounds.north_east
        ));
    }
}

pub(crate) fn render_view(view: &ResultView) -> String {
    let mut out = String::new();
    match view {
        ResultView::Skeleton { cards } => {
            out.push_str("Searching nearby...\n");
            for _ in 0..*cards {
                out.push_str("  [ ........................ ]\n");
            }
        }
        ResultView::ErrorBanner { message } => {
            let _ = writeln!(out, "!! {message}");
        }
        ResultView::Empty { title, hint } => {
            let _ = writeln!(out, "{title}\n{hint}");
        }
        ResultView::Results {
            header,
            cards,
            markers,
        } => {
            let _ = writeln!(out, "{}", header.summary);
            for card in cards {
                let specialties = if card.specialties.is_empty() {
                    "-".to_owned()
                } else {
                    card.specialties.join(", ")
                };
                let _ = writeln!(
                    out,
                    "{:>3}. ({}) {:<28} {:>8}  {}",
                    card.index + 1,
                    card.initial,
                    card.name,
                    card.distance_label,
                    specialties
                );
            }
            let _ = writeln!(
                out,
                "{} of {} shown on the map",
                markers.len(),
                header.count
            );
        }
    }
    out
}

pub(crate) fn render_detail(detail: &DetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "({}) {}  {}", detail.initial, detail.full_name, detail.distance_label);
    let _ = writeln!(out, "{}", detail.description);
    if !detail.specialties.is_empty() {
        out.push_str("Specialties:\n");
        for s in &detail.specialties {
            let _ = write!(out, "  - {}: {}", s.name, s.experience);
            if let Some(description) = &s.description {
                let _ = write!(out, " ({description})");
            }
            out.push('\n');
        }
    }
    if let Some(phone) = &detail.phone {
        let _ = writeln!(out, "Phone: {phone}");
    }
    if let Some(link) = &detail.call_link {
        let _ = writeln!(out, "Call: {link}");
    }
    if let Some(link) = &detail.whatsapp_link {
        let _ = writeln!(out, "WhatsApp: {link}");
    }
    out
}
