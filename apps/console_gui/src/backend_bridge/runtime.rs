//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{ConsoleClient, ConsoleSettings};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{MutationKind, UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread. Each command runs as its own task on the worker's runtime.
pub fn launch(settings: ConsoleSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("Backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match ConsoleClient::connect(&settings) {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("Backend worker startup failure: {err}"),
                )));
                tracing::error!("failed to configure api client: {err}");
                return;
            }
        };
        let _ = ui_tx.try_send(UiEvent::Info(format!(
            "Connected to {}",
            settings.api_base_url
        )));

        while let Ok(cmd) = cmd_rx.recv() {
            let client = client.clone();
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let event = handle_command(&client, cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event receiver dropped");
                }
            });
        }
        tracing::info!("ui command queue closed; backend worker exiting");
    });
}

async fn handle_command(client: &ConsoleClient, cmd: BackendCommand) -> UiEvent {
    let listing_error = |err: client_core::ClientError| {
        tracing::warn!("listing fetch failed: {err}");
        UiError::from_message(UiErrorContext::Listing, err.to_string())
    };

    match cmd {
        BackendCommand::LoadBuses(ticket) => UiEvent::BusPage {
            generation: ticket.generation,
            result: client.bus_page(&ticket.query).await.map_err(listing_error),
        },
        BackendCommand::LoadCities(ticket) => UiEvent::CityPage {
            generation: ticket.generation,
            result: client.city_page(&ticket.query).await.map_err(listing_error),
        },
        BackendCommand::LoadUsers(ticket) => UiEvent::UserPage {
            generation: ticket.generation,
            result: client.user_page(&ticket.query).await.map_err(listing_error),
        },
        BackendCommand::LoadBusFormOptions => {
            UiEvent::BusFormOptionsLoaded(client.bus_form_options().await)
        }
        BackendCommand::CreateBus(form) => mutation_event(
            MutationKind::CreateBus,
            client.submit_bus(&form).await.map_err(|err| err.to_string()),
        ),
        BackendCommand::CreateCity(form) => mutation_event(
            MutationKind::CreateCity,
            client.submit_city(&form).await.map_err(|err| err.to_string()),
        ),
        BackendCommand::AddStop { pincode, draft } => {
            let result = client
                .add_stop(&pincode, &draft)
                .await
                .map_err(|err| err.to_string());
            mutation_event(MutationKind::AddStop { pincode }, result)
        }
        BackendCommand::DeleteStop { pincode, stop_id } => {
            let result = client
                .delete_stop(&pincode, &stop_id)
                .await
                .map_err(|err| err.to_string());
            mutation_event(MutationKind::DeleteStop { pincode, stop_id }, result)
        }
    }
}

fn mutation_event(kind: MutationKind, result: Result<(), String>) -> UiEvent {
    if let Err(err) = &result {
        tracing::warn!(?kind, "mutation failed: {err}");
    }
    UiEvent::MutationFinished {
        kind,
        result: result.map_err(|err| UiError::from_message(UiErrorContext::Mutation, err)),
    }
}
