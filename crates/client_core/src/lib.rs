use std::sync::Arc;

use shared::{
    domain::{CityRecord, EnrichedBus, UserRecord},
    protocol::AddStopsRequest,
};
use tracing::info;

pub mod api;
pub mod assembler;
pub mod config;
pub mod error;
pub mod forms;
pub mod listing;
pub mod pipeline;
pub mod resolver;

pub use api::{AdminApi, HttpAdminApi};
pub use config::{load_settings, ConsoleSettings};
pub use error::{ClientError, SubmitError};
pub use forms::{BusForm, CityForm, FormError, StopDraft};
pub use listing::{FetchTicket, ListingQuery, ListingView, Page};
pub use pipeline::BusFormOptions;

/// Entry point used by the console front ends.
///
/// Wraps an [`AdminApi`] with the page loaders and the validated form submissions.
#[derive(Clone)]
pub struct ConsoleClient {
    api: Arc<dyn AdminApi>,
}

impl ConsoleClient {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    pub fn connect(settings: &ConsoleSettings) -> Result<Self, ClientError> {
        let api = HttpAdminApi::new(settings.base_url()?);
        info!(base_url = %api.base_url(), "console client configured");
        Ok(Self::new(Arc::new(api)))
    }

    pub fn api(&self) -> &dyn AdminApi {
        self.api.as_ref()
    }

    pub async fn bus_page(&self, query: &ListingQuery) -> Result<Page<EnrichedBus>, ClientError> {
        pipeline::load_bus_page(self.api(), query).await
    }

    pub async fn city_page(&self, query: &ListingQuery) -> Result<Page<CityRecord>, ClientError> {
        pipeline::load_city_page(self.api(), query).await
    }

    pub async fn user_page(&self, query: &ListingQuery) -> Result<Page<UserRecord>, ClientError> {
        pipeline::load_user_page(self.api(), query).await
    }

    pub async fn bus_form_options(&self) -> BusFormOptions {
        pipeline::load_bus_form_options(self.api()).await
    }

    pub async fn submit_bus(&self, form: &BusForm) -> Result<(), SubmitError> {
        let request = form.to_request()?;
        self.api.create_bus(&request).await?;
        info!(bus_id = %request.bus_id, "bus created");
        Ok(())
    }

    pub async fn submit_city(&self, form: &CityForm) -> Result<(), SubmitError> {
        let request = form.to_request()?;
        self.api.create_city(&request).await?;
        info!(pincode = %request.city_pincode, stops = request.stops.len(), "city created");
        Ok(())
    }

    /// Appends one stop to an existing city.
    pub async fn add_stop(&self, pincode: &str, draft: &StopDraft) -> Result<(), SubmitError> {
        let stop = draft.to_patch()?;
        let stop_id = stop.stop_id.clone();
        self.api
            .add_stops(pincode, &AddStopsRequest { stops: vec![stop] })
            .await?;
        info!(pincode, stop_id = %stop_id, "stop added");
        Ok(())
    }

    pub async fn delete_stop(&self, pincode: &str, stop_id: &str) -> Result<(), ClientError> {
        self.api.delete_stop(pincode, stop_id).await?;
        info!(pincode, stop_id, "stop deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
