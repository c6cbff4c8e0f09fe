use client_core::listing::{BUS_SORT_KEYS, CITY_SORT_KEYS, USER_SORT_KEYS};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{err_label, UiEvent},
    orchestration::dispatch_all,
    reducer::ConsoleState,
};
use crate::ui::{
    forms,
    menu::{dashboard_links, Screen, NAV_MENU},
    tables,
};

const IDLE_REPAINT: std::time::Duration = std::time::Duration::from_millis(100);

pub struct ConsoleApp {
    state: ConsoleState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
}

impl ConsoleApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            state: ConsoleState::default(),
            cmd_tx,
            ui_rx,
        }
    }

    fn dispatch(&mut self, cmds: Vec<BackendCommand>) {
        dispatch_all(&self.cmd_tx, cmds, &mut self.state.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let cmds = self.state.apply(event);
            self.dispatch(cmds);
        }
    }

    fn show_navigation(&mut self, ctx: &egui::Context) {
        let mut target = self.state.screen;
        egui::SidePanel::left("navigation_panel")
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                ui.heading("Bus Admin");
                ui.separator();
                ui.selectable_value(&mut target, Screen::Dashboard, Screen::Dashboard.title());
                for group in NAV_MENU {
                    ui.collapsing(group.title, |ui| {
                        for screen in group.entries {
                            ui.selectable_value(&mut target, *screen, screen.title());
                        }
                    });
                }
            });
        if target != self.state.screen {
            let cmds = self.state.navigate(target);
            self.dispatch(cmds);
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(26.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if self.state.is_busy() {
                        ui.spinner();
                    }
                    match &self.state.banner {
                        Some(err) => {
                            ui.colored_label(
                                ui.visuals().error_fg_color,
                                format!("{}: {}", err_label(err.category()), err.message()),
                            );
                            if ui.small_button("Dismiss").clicked() {
                                self.state.banner = None;
                            }
                        }
                        None => {
                            ui.label(&self.state.status);
                        }
                    }
                });
            });
    }

    fn show_screen(&mut self, ctx: &egui::Context) {
        let mut cmds = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.state.screen.title());
            ui.separator();
            match self.state.screen {
                Screen::Dashboard => cmds.extend(self.show_dashboard(ui)),
                Screen::Buses => cmds.extend(self.show_buses(ui)),
                Screen::Stops => cmds.extend(self.show_cities(ui)),
                Screen::Users => cmds.extend(self.show_users(ui)),
            }
        });
        self.dispatch(cmds);
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) -> Vec<BackendCommand> {
        ui.label("Manage the bus network from the sections below.");
        ui.add_space(8.0);
        let mut target = None;
        ui.horizontal(|ui| {
            for screen in dashboard_links() {
                if ui.button(screen.title()).clicked() {
                    target = Some(screen);
                }
            }
        });
        target
            .map(|screen| self.state.navigate(screen))
            .unwrap_or_default()
    }

    fn show_buses(&mut self, ui: &mut egui::Ui) -> Vec<BackendCommand> {
        let mut cmds = Vec::new();
        ui.horizontal(|ui| {
            if ui.button("Add Bus").clicked() {
                cmds.extend(self.state.open_bus_form());
            }
            if let Some(action) =
                tables::sort_controls(ui, "bus_sort_key", &self.state.buses, BUS_SORT_KEYS)
            {
                cmds.extend(self.state.bus_action(action));
            }
        });
        ui.add_space(6.0);
        tables::bus_table(ui, &self.state.buses);
        if let Some(action) = tables::pagination(ui, &self.state.buses) {
            cmds.extend(self.state.bus_action(action));
        }
        cmds
    }

    fn show_cities(&mut self, ui: &mut egui::Ui) -> Vec<BackendCommand> {
        let mut cmds = Vec::new();
        ui.horizontal(|ui| {
            if ui.button("Create City").clicked() {
                self.state.open_city_form();
            }
            if let Some(action) =
                tables::sort_controls(ui, "city_sort_key", &self.state.cities, CITY_SORT_KEYS)
            {
                cmds.extend(self.state.city_action(action));
            }
        });
        ui.add_space(6.0);
        if let Some(city) = tables::city_table(ui, &self.state.cities) {
            self.state.open_stops(&city);
        }
        if let Some(action) = tables::pagination(ui, &self.state.cities) {
            cmds.extend(self.state.city_action(action));
        }
        cmds
    }

    fn show_users(&mut self, ui: &mut egui::Ui) -> Vec<BackendCommand> {
        let mut cmds = Vec::new();
        if let Some(action) =
            tables::sort_controls(ui, "user_sort_key", &self.state.users, USER_SORT_KEYS)
        {
            cmds.extend(self.state.user_action(action));
        }
        ui.add_space(6.0);
        tables::user_table(ui, &self.state.users);
        if let Some(action) = tables::pagination(ui, &self.state.users) {
            cmds.extend(self.state.user_action(action));
        }
        cmds
    }

    fn show_windows(&mut self, ctx: &egui::Context) {
        let mut cmds = forms::bus_form_window(ctx, &mut self.state);
        cmds.extend(forms::city_form_window(ctx, &mut self.state));
        cmds.extend(forms::stops_window(ctx, &mut self.state));
        self.dispatch(cmds);
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_navigation(ctx);
        self.show_status_bar(ctx);
        self.show_screen(ctx);
        self.show_windows(ctx);

        ctx.request_repaint_after(IDLE_REPAINT);
    }
}
