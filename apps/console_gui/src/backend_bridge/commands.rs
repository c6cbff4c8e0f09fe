//! Backend commands queued from UI to backend worker.

use client_core::{BusForm, CityForm, FetchTicket, StopDraft};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    LoadBuses(FetchTicket),
    LoadCities(FetchTicket),
    LoadUsers(FetchTicket),
    LoadBusFormOptions,
    CreateBus(BusForm),
    CreateCity(CityForm),
    AddStop {
        pincode: String,
        draft: StopDraft,
    },
    DeleteStop {
        pincode: String,
        stop_id: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadBuses(_) => "load_buses",
            BackendCommand::LoadCities(_) => "load_cities",
            BackendCommand::LoadUsers(_) => "load_users",
            BackendCommand::LoadBusFormOptions => "load_bus_form_options",
            BackendCommand::CreateBus(_) => "create_bus",
            BackendCommand::CreateCity(_) => "create_city",
            BackendCommand::AddStop { .. } => "add_stop",
            BackendCommand::DeleteStop { .. } => "delete_stop",
        }
    }
}
