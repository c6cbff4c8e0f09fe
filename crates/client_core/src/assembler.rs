use shared::domain::{BusRecord, EnrichedBus, Stop, UNKNOWN_CITY, UNKNOWN_OWNER};

use crate::resolver::ResolvedReferences;

/// Merges a bus with its resolved display values.
///
/// Blank values fall back to the unknown-reference text, and the rest-stop names are padded or
/// truncated so they stay parallel to `bus.rest_stops`.
pub fn assemble(bus: BusRecord, references: ResolvedReferences) -> EnrichedBus {
    let ResolvedReferences {
        owner_name,
        source_city,
        destination_city,
        mut rest_stops_cities,
    } = references;

    rest_stops_cities.resize(bus.rest_stops.len(), UNKNOWN_CITY.to_string());
    let rest_stops_cities = rest_stops_cities
        .into_iter()
        .map(|name| or_fallback(name, UNKNOWN_CITY))
        .collect();

    EnrichedBus {
        owner_name: or_fallback(owner_name, UNKNOWN_OWNER),
        source_city: or_fallback(source_city, UNKNOWN_CITY),
        destination_city: or_fallback(destination_city, UNKNOWN_CITY),
        rest_stops_cities,
        bus,
    }
}

fn or_fallback(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

pub fn rest_stops_label(bus: &EnrichedBus) -> String {
    bus.rest_stops_cities.join(", ")
}

pub fn earnings_label(earning_per_day: f64) -> String {
    format!("₹{earning_per_day}")
}

pub fn user_status_label(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

pub fn stop_summary(stop: &Stop) -> String {
    format!(
        "{} - {} - {} mins",
        stop.stop_name, stop.stop_timings, stop.stop_duration
    )
}
