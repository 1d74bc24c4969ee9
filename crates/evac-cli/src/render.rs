//! Plain-text rendering of advisories for the terminal.

use evac_core::{AdvisoryState, Severity};

use crate::client::ZoneListing;

/// Steps shown before collapsing the rest into a count.
pub const MAX_STEPS_SHOWN: usize = 5;

pub fn render_advisory(state: &AdvisoryState) -> String {
    let mut out = String::new();
    let Some(classification) = state.classification.as_ref() else {
        return "No advisory available".to_string();
    };

    match classification.status {
        Severity::Safe => {
            out.push_str("SAFE: no evacuation needed at this time.\n");
            out.push_str("Continue monitoring alerts for updates.\n");
            return out;
        }
        Severity::Critical => out.push_str("CRITICAL: EVACUATE IMMEDIATELY\n"),
        Severity::Warning => out.push_str("WARNING: prepare to evacuate\n"),
    }

    if let Some(zone) = classification.matched_zone.as_ref() {
        let label = zone.display.name.as_deref().unwrap_or(&zone.id);
        match classification.distance_km {
            Some(d) => out.push_str(&format!("Hazard: {} ({:.1} km away)\n", label, d)),
            None => out.push_str(&format!("Hazard: {}\n", label)),
        }
    }

    if state.no_shelter_available {
        out.push_str("No shelter is registered for this hazard zone.\n");
        return out;
    }

    if let Some(shelter) = state.selected_shelter.as_ref() {
        out.push_str(&format!("Shelter: {}\n", shelter.name));
    }

    match state.route.as_ref() {
        Some(route) => {
            let source = if route.is_fallback {
                " (straight-line estimate)"
            } else {
                ""
            };
            out.push_str(&format!(
                "Route: {:.1} km, ~{} min{}\n",
                route.total_distance_km,
                route.total_duration_min.round() as i64,
                source
            ));
            for (idx, step) in route.steps.iter().take(MAX_STEPS_SHOWN).enumerate() {
                let direction = step
                    .turn_direction
                    .as_deref()
                    .map(|d| format!(" [{}]", d))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  {}. {}{} - {:.1} km\n",
                    idx + 1,
                    step.instruction,
                    direction,
                    step.distance_km
                ));
            }
            if route.steps.len() > MAX_STEPS_SHOWN {
                out.push_str(&format!(
                    "  +{} more steps\n",
                    route.steps.len() - MAX_STEPS_SHOWN
                ));
            }
        }
        None if state.is_route_loading => out.push_str("Route: calculating...\n"),
        None => {}
    }

    out
}

pub fn render_zone(listing: &ZoneListing) -> String {
    let zone = &listing.zone;
    let label = zone.display.name.as_deref().unwrap_or(&zone.id);
    let distance = listing
        .distance_km
        .map(|d| format!(" {:.1} km", d))
        .unwrap_or_default();
    format!(
        "[{:<8}] {} ({}){} - {} shelter(s)",
        zone.severity.as_str(),
        label,
        zone.id,
        distance,
        zone.shelters.len()
    )
}
