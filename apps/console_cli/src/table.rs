//! Plain-text table rendering for listing output.

use client_core::assembler::{
    earnings_label, rest_stops_label, stop_summary, user_status_label,
};
use shared::domain::{CityRecord, EnrichedBus, UserRecord};

pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_row(headers.iter().copied(), &widths)];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn bus_rows(buses: &[EnrichedBus]) -> Vec<Vec<String>> {
    buses
        .iter()
        .map(|row| {
            vec![
                row.bus.bus_id.clone(),
                row.bus.bus_number.clone(),
                row.bus.bus_capacity.to_string(),
                earnings_label(row.bus.earning_per_day),
                row.owner_name.clone(),
                row.source_city.clone(),
                row.destination_city.clone(),
                rest_stops_label(row),
            ]
        })
        .collect()
}

pub const BUS_HEADERS: &[&str] = &[
    "ID",
    "Bus Number",
    "Capacity",
    "Earning Per Day",
    "Owner",
    "Source",
    "Destination",
    "Rest Stops",
];

pub const CITY_HEADERS: &[&str] = &["City Name", "City Pincode", "Stops"];

pub fn city_rows(cities: &[CityRecord]) -> Vec<Vec<String>> {
    cities
        .iter()
        .map(|city| {
            vec![
                city.city_name.clone(),
                city.city_pincode.clone(),
                city.stops
                    .iter()
                    .map(stop_summary)
                    .collect::<Vec<_>>()
                    .join("; "),
            ]
        })
        .collect()
}

pub const USER_HEADERS: &[&str] = &["ID", "Name", "Email", "Phone", "Account Type", "Status"];

pub fn user_rows(users: &[UserRecord]) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|user| {
            vec![
                user.record_id.to_string(),
                user.name.clone(),
                user.email.clone(),
                user.phone_number.clone(),
                user.account_type.clone(),
                user_status_label(user.active).to_string(),
            ]
        })
        .collect()
}
