//! Reference resolution for listed buses.
//!
//! Every foreign key on a bus becomes its own lookup. Lookups never fail: a missing record, a
//! transport error, or a response without the expected field all degrade to the fallback text,
//! so one bad reference cannot take down its row.

use futures::future::join_all;
use shared::domain::{BusRecord, CityId, EnrichedBus, UserId, UNKNOWN_CITY, UNKNOWN_OWNER};
use tracing::warn;

use crate::{api::AdminApi, assembler::assemble};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReferences {
    pub owner_name: String,
    pub source_city: String,
    pub destination_city: String,
    pub rest_stops_cities: Vec<String>,
}

pub struct ReferenceResolver<'a, A: ?Sized> {
    api: &'a A,
}

impl<'a, A: AdminApi + ?Sized> ReferenceResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn owner_name(&self, owner_id: &UserId) -> String {
        if owner_id.is_blank() {
            warn!(field = "ownerId", "owner reference is blank");
            return UNKNOWN_OWNER.to_string();
        }
        match self.api.fetch_user(owner_id).await {
            Ok(owner) => match owner.display_name() {
                Some(name) => name.to_string(),
                None => {
                    warn!(owner_id = %owner_id, "owner lookup returned no name");
                    UNKNOWN_OWNER.to_string()
                }
            },
            Err(err) => {
                warn!(owner_id = %owner_id, "owner lookup failed: {err}");
                UNKNOWN_OWNER.to_string()
            }
        }
    }

    pub async fn city_name(&self, city_id: &CityId) -> String {
        self.city_field("city", city_id).await
    }

    async fn city_field(&self, field: &'static str, city_id: &CityId) -> String {
        if city_id.is_blank() {
            warn!(field, "city reference is blank");
            return UNKNOWN_CITY.to_string();
        }
        match self.api.fetch_city(city_id).await {
            Ok(city) => match city.display_name() {
                Some(name) => name.to_string(),
                None => {
                    warn!(field, city_id = %city_id, "city lookup returned no name");
                    UNKNOWN_CITY.to_string()
                }
            },
            Err(err) => {
                warn!(field, city_id = %city_id, "city lookup failed: {err}");
                UNKNOWN_CITY.to_string()
            }
        }
    }

    /// Issues every lookup for one bus concurrently and waits for all of them.
    pub async fn resolve_bus(&self, bus: &BusRecord) -> ResolvedReferences {
        let rest_stops = join_all(
            bus.rest_stops
                .iter()
                .map(|city_id| self.city_field("restStops", city_id)),
        );
        let (owner_name, source_city, destination_city, rest_stops_cities) = futures::join!(
            self.owner_name(&bus.owner_id),
            self.city_field("source", &bus.source),
            self.city_field("destination", &bus.destination),
            rest_stops,
        );
        ResolvedReferences {
            owner_name,
            source_city,
            destination_city,
            rest_stops_cities,
        }
    }

    /// Resolves all rows concurrently; returns only once every row is ready, in input order.
    pub async fn enrich_all(&self, buses: Vec<BusRecord>) -> Vec<EnrichedBus> {
        join_all(buses.into_iter().map(move |bus| async move {
            let references = self.resolve_bus(&bus).await;
            assemble(bus, references)
        }))
        .await
    }
}
