//! Create-bus and create-city windows plus the stops dialog.

use client_core::assembler::stop_summary;
use eframe::egui;
use shared::domain::Stop;

use crate::{
    backend_bridge::commands::BackendCommand, controller::reducer::ConsoleState,
};

const DURATION_RANGE: std::ops::RangeInclusive<u32> = 0..=600;

pub fn bus_form_window(ctx: &egui::Context, state: &mut ConsoleState) -> Vec<BackendCommand> {
    if !state.bus_form_open {
        return Vec::new();
    }
    let mut open = true;
    let mut submit = false;
    let busy = state.is_busy();
    let form = &mut state.bus_form;
    let options = &state.bus_options;
    let options_loading = state.options_loading;

    egui::Window::new("Add Bus")
        .open(&mut open)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            if options_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading owners, staff and cities...");
                });
            }

            egui::Grid::new("bus_form_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Owner");
                    let owner_label = form
                        .owner_id
                        .as_ref()
                        .and_then(|id| options.owners.iter().find(|user| &user.id() == id))
                        .map(|user| user.picker_label().to_string())
                        .unwrap_or_else(|| "Select owner".to_string());
                    egui::ComboBox::from_id_salt("bus_owner_picker")
                        .selected_text(owner_label)
                        .show_ui(ui, |ui| {
                            for user in &options.owners {
                                ui.selectable_value(
                                    &mut form.owner_id,
                                    Some(user.id()),
                                    user.picker_label(),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label("Bus Number");
                    ui.text_edit_singleline(&mut form.bus_number);
                    ui.end_row();

                    ui.label("Capacity");
                    ui.add(egui::DragValue::new(&mut form.bus_capacity).range(0..=200));
                    ui.end_row();

                    for (label, salt, selection) in [
                        ("Source", "bus_source_picker", &mut form.source),
                        ("Destination", "bus_destination_picker", &mut form.destination),
                    ] {
                        ui.label(label);
                        let selected_text = selection
                            .as_ref()
                            .and_then(|id| {
                                options.cities.iter().find(|city| &city.city_ref() == id)
                            })
                            .map(|city| city.city_name.clone())
                            .unwrap_or_else(|| format!("Select {}", label.to_lowercase()));
                        egui::ComboBox::from_id_salt(salt)
                            .selected_text(selected_text)
                            .show_ui(ui, |ui| {
                                for city in &options.cities {
                                    ui.selectable_value(
                                        selection,
                                        Some(city.city_ref()),
                                        &city.city_name,
                                    );
                                }
                            });
                        ui.end_row();
                    }
                });

            ui.separator();
            ui.label("Rest Stops");
            egui::ComboBox::from_id_salt("bus_rest_stop_picker")
                .selected_text("Add rest stop")
                .show_ui(ui, |ui| {
                    for city in &options.cities {
                        if ui.button(&city.city_name).clicked() {
                            form.add_rest_stop(city);
                        }
                    }
                });
            let mut remove_stop = None;
            for stop in &form.rest_stops {
                ui.horizontal(|ui| {
                    ui.label(&stop.name);
                    if ui.small_button("✕").clicked() {
                        remove_stop = Some(stop.id.clone());
                    }
                });
            }
            if let Some(id) = remove_stop {
                form.remove_rest_stop(&id);
            }

            ui.separator();
            ui.label("Staff");
            egui::ComboBox::from_id_salt("bus_staff_picker")
                .selected_text("Add staff member")
                .show_ui(ui, |ui| {
                    for user in &options.staff {
                        if ui.button(user.picker_label()).clicked() {
                            form.add_staff(user);
                        }
                    }
                });
            let mut remove_staff = None;
            for member in &form.staff {
                ui.horizontal(|ui| {
                    ui.label(&member.label);
                    if ui.small_button("✕").clicked() {
                        remove_staff = Some(member.id.clone());
                    }
                });
            }
            if let Some(id) = remove_staff {
                form.remove_staff(&id);
            }

            ui.separator();
            if ui.add_enabled(!busy, egui::Button::new("Add Bus")).clicked() {
                submit = true;
            }
        });

    state.bus_form_open = open;
    if submit {
        state.submit_bus_form()
    } else {
        Vec::new()
    }
}

pub fn city_form_window(ctx: &egui::Context, state: &mut ConsoleState) -> Vec<BackendCommand> {
    if !state.city_form_open {
        return Vec::new();
    }
    let mut open = true;
    let mut add_stop = false;
    let mut submit = false;
    let busy = state.is_busy();
    let form = &mut state.city_form;

    egui::Window::new("Create City")
        .open(&mut open)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            egui::Grid::new("city_form_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("City Name");
                    ui.text_edit_singleline(&mut form.city_name);
                    ui.end_row();

                    ui.label("City Pincode");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.city_pincode)
                            .char_limit(6)
                            .hint_text("6 digits"),
                    );
                    ui.end_row();
                });

            ui.separator();
            ui.strong("Stops");
            draft_editor(ui, "city_stop_draft", &mut form.draft);
            if ui.button("Add Stop").clicked() {
                add_stop = true;
            }

            let mut remove = None;
            for (index, stop) in form.stops.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} - {} - {} mins",
                        stop.stop_name, stop.stop_timings, stop.stop_duration
                    ));
                    if ui.small_button("✕").clicked() {
                        remove = Some(index);
                    }
                });
            }
            if let Some(index) = remove {
                form.remove_stop(index);
            }

            ui.separator();
            if ui.add_enabled(!busy, egui::Button::new("Create City")).clicked() {
                submit = true;
            }
        });

    state.city_form_open = open;
    if add_stop {
        state.add_city_stop();
    }
    if submit {
        state.submit_city_form()
    } else {
        Vec::new()
    }
}

pub fn stops_window(ctx: &egui::Context, state: &mut ConsoleState) -> Vec<BackendCommand> {
    let stops: Vec<Stop> = state.dialog_stops().to_vec();
    let busy = state.is_busy();
    let Some(dialog) = state.stops_dialog.as_mut() else {
        return Vec::new();
    };

    let mut open = true;
    let mut add_stop = false;
    let mut remove = None;

    egui::Window::new(format!("Stops in {}", dialog.city_name))
        .id(egui::Id::new("stops_dialog"))
        .open(&mut open)
        .resizable(true)
        .show(ctx, |ui| {
            if stops.is_empty() {
                ui.label("No stops yet");
            }
            for stop in &stops {
                ui.horizontal(|ui| {
                    ui.label(stop_summary(stop));
                    if ui.add_enabled(!busy, egui::Button::new("Remove")).clicked() {
                        remove = Some(stop.stop_id.clone());
                    }
                });
            }

            ui.separator();
            ui.strong("Add Stop");
            draft_editor(ui, "dialog_stop_draft", &mut dialog.draft);
            if ui.add_enabled(!busy, egui::Button::new("Add Stop")).clicked() {
                add_stop = true;
            }
        });

    if !open {
        state.close_stops();
        return Vec::new();
    }
    let mut cmds = Vec::new();
    if let Some(stop_id) = remove {
        cmds.extend(state.delete_stop(&stop_id));
    }
    if add_stop {
        cmds.extend(state.submit_stop_draft());
    }
    cmds
}

fn draft_editor(ui: &mut egui::Ui, id_salt: &str, draft: &mut client_core::StopDraft) {
    egui::Grid::new(id_salt)
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Stop Name");
            ui.text_edit_singleline(&mut draft.stop_name);
            ui.end_row();

            ui.label("Stop Timings");
            ui.add(egui::TextEdit::singleline(&mut draft.stop_timings).hint_text("HH:MM"));
            ui.end_row();

            ui.label("Stop Duration (mins)");
            ui.add(egui::DragValue::new(&mut draft.stop_duration).range(DURATION_RANGE));
            ui.end_row();
        });
}
