//! Console state and its transitions.
//!
//! Every UI action and backend event goes through [`ConsoleState`], which returns the backend
//! commands to queue. Nothing here touches egui or the channels, so the transitions are tested
//! directly.

use client_core::{
    listing::CommitOutcome, BusForm, BusFormOptions, CityForm, FetchTicket, ListingQuery,
    ListingView, StopDraft,
};
use shared::domain::{CityRecord, EnrichedBus, Stop, UserRecord};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{MutationKind, PageResult, UiError, UiErrorContext, UiEvent},
    ui::menu::Screen,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingAction {
    Refresh,
    GoTo(u32),
    Next,
    Previous,
    SortKey(&'static str),
    ToggleOrder,
}

fn apply_listing_action<T>(view: &mut ListingView<T>, action: ListingAction) -> Option<FetchTicket> {
    match action {
        ListingAction::Refresh => Some(view.refresh()),
        ListingAction::GoTo(page) => view.go_to_page(page),
        ListingAction::Next => view.next_page(),
        ListingAction::Previous => view.previous_page(),
        ListingAction::SortKey(key) => view.set_sort_key(key),
        ListingAction::ToggleOrder => view.toggle_sort_order(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopsDialog {
    pub pincode: String,
    pub city_name: String,
    pub draft: StopDraft,
}

pub struct ConsoleState {
    pub screen: Screen,
    pub buses: ListingView<EnrichedBus>,
    pub cities: ListingView<CityRecord>,
    pub users: ListingView<UserRecord>,
    pub bus_form: BusForm,
    pub bus_form_open: bool,
    pub bus_options: BusFormOptions,
    pub options_loading: bool,
    pub city_form: CityForm,
    pub city_form_open: bool,
    pub stops_dialog: Option<StopsDialog>,
    pub pending_mutations: usize,
    pub status: String,
    pub banner: Option<UiError>,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self {
            screen: Screen::Dashboard,
            buses: ListingView::new(ListingQuery::buses()),
            cities: ListingView::new(ListingQuery::cities()),
            users: ListingView::new(ListingQuery::staff_users()),
            bus_form: BusForm::default(),
            bus_form_open: false,
            bus_options: BusFormOptions::default(),
            options_loading: false,
            city_form: CityForm::default(),
            city_form_open: false,
            stops_dialog: None,
            pending_mutations: 0,
            status: String::new(),
            banner: None,
        }
    }
}

impl ConsoleState {
    /// Switching screens always reloads the target listing.
    pub fn navigate(&mut self, screen: Screen) -> Vec<BackendCommand> {
        self.screen = screen;
        let action = ListingAction::Refresh;
        match screen {
            Screen::Dashboard => Vec::new(),
            Screen::Buses => self.bus_action(action),
            Screen::Stops => self.city_action(action),
            Screen::Users => self.user_action(action),
        }
    }

    pub fn bus_action(&mut self, action: ListingAction) -> Vec<BackendCommand> {
        apply_listing_action(&mut self.buses, action)
            .map(BackendCommand::LoadBuses)
            .into_iter()
            .collect()
    }

    pub fn city_action(&mut self, action: ListingAction) -> Vec<BackendCommand> {
        apply_listing_action(&mut self.cities, action)
            .map(BackendCommand::LoadCities)
            .into_iter()
            .collect()
    }

    pub fn user_action(&mut self, action: ListingAction) -> Vec<BackendCommand> {
        apply_listing_action(&mut self.users, action)
            .map(BackendCommand::LoadUsers)
            .into_iter()
            .collect()
    }

    pub fn open_bus_form(&mut self) -> Vec<BackendCommand> {
        self.bus_form_open = true;
        self.options_loading = true;
        vec![BackendCommand::LoadBusFormOptions]
    }

    pub fn submit_bus_form(&mut self) -> Vec<BackendCommand> {
        if let Err(err) = self.bus_form.to_request() {
            self.reject(err);
            return Vec::new();
        }
        self.start_mutation("Adding bus...");
        vec![BackendCommand::CreateBus(self.bus_form.clone())]
    }

    pub fn open_city_form(&mut self) {
        self.city_form_open = true;
    }

    pub fn add_city_stop(&mut self) {
        match self.city_form.add_draft_stop() {
            Ok(()) => self.banner = None,
            Err(err) => self.reject(err),
        }
    }

    pub fn submit_city_form(&mut self) -> Vec<BackendCommand> {
        if let Err(err) = self.city_form.to_request() {
            self.reject(err);
            return Vec::new();
        }
        self.start_mutation("Creating city...");
        vec![BackendCommand::CreateCity(self.city_form.clone())]
    }

    pub fn open_stops(&mut self, city: &CityRecord) {
        self.stops_dialog = Some(StopsDialog {
            pincode: city.city_pincode.clone(),
            city_name: city.city_name.clone(),
            draft: StopDraft::default(),
        });
    }

    pub fn close_stops(&mut self) {
        self.stops_dialog = None;
    }

    /// Stops of the city shown in the dialog, read from the latest city page.
    pub fn dialog_stops(&self) -> &[Stop] {
        let Some(dialog) = &self.stops_dialog else {
            return &[];
        };
        self.cities
            .rows()
            .iter()
            .find(|city| city.city_pincode == dialog.pincode)
            .map(|city| city.stops.as_slice())
            .unwrap_or(&[])
    }

    pub fn submit_stop_draft(&mut self) -> Vec<BackendCommand> {
        let Some(dialog) = &self.stops_dialog else {
            return Vec::new();
        };
        if let Err(err) = dialog.draft.validate() {
            self.reject(err);
            return Vec::new();
        }
        let cmd = BackendCommand::AddStop {
            pincode: dialog.pincode.clone(),
            draft: dialog.draft.clone(),
        };
        self.start_mutation("Adding stop...");
        vec![cmd]
    }

    pub fn delete_stop(&mut self, stop_id: &str) -> Vec<BackendCommand> {
        let Some(dialog) = &self.stops_dialog else {
            return Vec::new();
        };
        let cmd = BackendCommand::DeleteStop {
            pincode: dialog.pincode.clone(),
            stop_id: stop_id.to_string(),
        };
        self.start_mutation("Removing stop...");
        vec![cmd]
    }

    pub fn apply(&mut self, event: UiEvent) -> Vec<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                Vec::new()
            }
            UiEvent::Error(err) => {
                self.show_error(err);
                Vec::new()
            }
            UiEvent::BusPage { generation, result } => {
                let outcome = commit_page(&mut self.buses, &mut self.status, generation, result);
                log_stale("buses", generation, outcome);
                Vec::new()
            }
            UiEvent::CityPage { generation, result } => {
                let outcome = commit_page(&mut self.cities, &mut self.status, generation, result);
                log_stale("cities", generation, outcome);
                Vec::new()
            }
            UiEvent::UserPage { generation, result } => {
                let outcome = commit_page(&mut self.users, &mut self.status, generation, result);
                log_stale("users", generation, outcome);
                Vec::new()
            }
            UiEvent::BusFormOptionsLoaded(options) => {
                self.options_loading = false;
                self.bus_options = options;
                Vec::new()
            }
            UiEvent::MutationFinished { kind, result } => {
                self.pending_mutations = self.pending_mutations.saturating_sub(1);
                match result {
                    Ok(()) => self.finish_mutation(kind),
                    Err(err) => {
                        self.show_error(err);
                        Vec::new()
                    }
                }
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending_mutations > 0
    }

    fn finish_mutation(&mut self, kind: MutationKind) -> Vec<BackendCommand> {
        self.status = kind.success_message();
        self.banner = None;
        match kind {
            MutationKind::CreateBus => {
                self.bus_form.reset();
                self.bus_form_open = false;
                self.bus_action(ListingAction::Refresh)
            }
            MutationKind::CreateCity => {
                self.city_form.reset();
                self.city_form_open = false;
                self.city_action(ListingAction::Refresh)
            }
            MutationKind::AddStop { pincode } => {
                if let Some(dialog) = self
                    .stops_dialog
                    .as_mut()
                    .filter(|dialog| dialog.pincode == pincode)
                {
                    dialog.draft = StopDraft::default();
                }
                self.city_action(ListingAction::Refresh)
            }
            MutationKind::DeleteStop { .. } => self.city_action(ListingAction::Refresh),
        }
    }

    fn start_mutation(&mut self, status: &str) {
        self.pending_mutations += 1;
        self.status = status.to_string();
        self.banner = None;
    }

    fn reject(&mut self, err: impl ToString) {
        self.show_error(UiError::from_message(UiErrorContext::Mutation, err.to_string()));
    }

    fn show_error(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
        self.status = err.banner_text();
        self.banner = Some(err);
    }
}

fn commit_page<T>(
    view: &mut ListingView<T>,
    status: &mut String,
    generation: u64,
    result: PageResult<T>,
) -> CommitOutcome {
    if generation == view.generation() {
        if let Err(err) = &result {
            *status = err.banner_text();
        }
    }
    view.commit(generation, result)
}

fn log_stale(listing: &str, generation: u64, outcome: CommitOutcome) {
    if outcome == CommitOutcome::Stale {
        tracing::debug!(listing, generation, "discarded stale page");
    }
}
