//! Listing tables with their sort and pagination controls.

use client_core::{
    assembler::{earnings_label, rest_stops_label, user_status_label},
    listing::{sort_key_label, SortKeyOption},
    ListingView,
};
use eframe::egui;
use shared::domain::{CityRecord, EnrichedBus, UserRecord};

use crate::controller::reducer::ListingAction;

pub const NO_BUSES: &str = "No Buses Found";
pub const NO_CITIES: &str = "No Cities Found";
pub const NO_USERS: &str = "No Users Found";

pub fn sort_controls<T>(
    ui: &mut egui::Ui,
    id_salt: &str,
    view: &ListingView<T>,
    options: &'static [SortKeyOption],
) -> Option<ListingAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        let current = view.query().sort_key.as_str();
        let mut selected = current;
        egui::ComboBox::from_id_salt(id_salt)
            .selected_text(sort_key_label(options, current))
            .show_ui(ui, |ui| {
                for option in options {
                    ui.selectable_value(&mut selected, option.key, option.label);
                }
            });
        if selected != current {
            action = options
                .iter()
                .find(|option| option.key == selected)
                .map(|option| ListingAction::SortKey(option.key));
        }

        if let Some(order) = view.query().sort_order.filter(|_| view.query().order_toggle) {
            if ui.button(order.label()).clicked() {
                action = Some(ListingAction::ToggleOrder);
            }
        }
    });
    action
}

/// Previous, numbered pages, Next. Hidden for single-page results.
pub fn pagination<T>(ui: &mut egui::Ui, view: &ListingView<T>) -> Option<ListingAction> {
    if !view.show_pagination() {
        return None;
    }
    let mut action = None;
    ui.horizontal(|ui| {
        if ui.button("Previous").clicked() {
            action = Some(ListingAction::Previous);
        }
        for page in view.page_numbers() {
            let button = egui::Button::new(page.to_string()).selected(page == view.current_page());
            if ui.add(button).clicked() {
                action = Some(ListingAction::GoTo(page));
            }
        }
        if ui.button("Next").clicked() {
            action = Some(ListingAction::Next);
        }
    });
    action
}

/// Draws the spinner or empty-state text; returns true when there are no rows to draw.
fn placeholder<T>(ui: &mut egui::Ui, view: &ListingView<T>, empty_text: &str) -> bool {
    if view.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
        return true;
    }
    if view.shows_empty_state() {
        ui.label(egui::RichText::new(empty_text).strong());
        return true;
    }
    view.rows().is_empty()
}

pub fn bus_table(ui: &mut egui::Ui, view: &ListingView<EnrichedBus>) {
    if placeholder(ui, view, NO_BUSES) {
        return;
    }
    egui::ScrollArea::horizontal().show(ui, |ui| {
        egui::Grid::new("bus_table")
            .striped(true)
            .num_columns(8)
            .show(ui, |ui| {
                for header in [
                    "ID",
                    "Bus Number",
                    "Capacity",
                    "Earning Per Day",
                    "Owner",
                    "Source",
                    "Destination",
                    "Rest Stops",
                ] {
                    ui.strong(header);
                }
                ui.end_row();

                for row in view.rows() {
                    ui.label(&row.bus.bus_id);
                    ui.label(&row.bus.bus_number);
                    ui.label(row.bus.bus_capacity.to_string());
                    ui.label(earnings_label(row.bus.earning_per_day));
                    ui.label(&row.owner_name);
                    ui.label(&row.source_city);
                    ui.label(&row.destination_city);
                    ui.label(rest_stops_label(row));
                    ui.end_row();
                }
            });
    });
}

/// Returns the city whose "View Stops" action was clicked.
pub fn city_table(ui: &mut egui::Ui, view: &ListingView<CityRecord>) -> Option<CityRecord> {
    if placeholder(ui, view, NO_CITIES) {
        return None;
    }
    let mut clicked = None;
    egui::Grid::new("city_table")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui| {
            ui.strong("City Name");
            ui.strong("City Pincode");
            ui.strong("Actions");
            ui.end_row();

            for city in view.rows() {
                ui.label(&city.city_name);
                ui.label(&city.city_pincode);
                if ui.button("View Stops").clicked() {
                    clicked = Some(city.clone());
                }
                ui.end_row();
            }
        });
    clicked
}

pub fn user_table(ui: &mut egui::Ui, view: &ListingView<UserRecord>) {
    if placeholder(ui, view, NO_USERS) {
        return;
    }
    egui::Grid::new("user_table")
        .striped(true)
        .num_columns(6)
        .show(ui, |ui| {
            for header in ["ID", "Name", "Email", "Phone", "Account Type", "Status"] {
                ui.strong(header);
            }
            ui.end_row();

            for user in view.rows() {
                ui.label(user.record_id.as_str());
                ui.label(&user.name);
                ui.label(&user.email);
                ui.label(&user.phone_number);
                ui.label(&user.account_type);
                ui.label(user_status_label(user.active));
                ui.end_row();
            }
        });
}
