//! Page loaders: list fetch, reference resolution, and assembly in one call.

use shared::domain::{CityRecord, EnrichedBus, UserRecord};
use tracing::{info, warn};

use crate::{
    api::AdminApi,
    error::ClientError,
    listing::{ListingQuery, Page},
    resolver::ReferenceResolver,
};

/// Fetches a page of buses and resolves every row before returning.
///
/// Only the list request can fail; reference lookups degrade to fallback text.
pub async fn load_bus_page<A: AdminApi + ?Sized>(
    api: &A,
    query: &ListingQuery,
) -> Result<Page<EnrichedBus>, ClientError> {
    let listing = api.list_buses(query).await?;
    let resolver = ReferenceResolver::new(api);
    let items = resolver.enrich_all(listing.buses).await;
    info!(
        page = query.page,
        rows = items.len(),
        total_pages = listing.total_pages,
        "bus page resolved"
    );
    Ok(Page {
        items,
        total_pages: listing.total_pages,
    })
}

pub async fn load_city_page<A: AdminApi + ?Sized>(
    api: &A,
    query: &ListingQuery,
) -> Result<Page<CityRecord>, ClientError> {
    let listing = api.list_cities(query).await?;
    info!(
        page = query.page,
        rows = listing.cities.len(),
        total_pages = listing.total_pages,
        "city page loaded"
    );
    Ok(Page {
        items: listing.cities,
        total_pages: listing.total_pages,
    })
}

pub async fn load_user_page<A: AdminApi + ?Sized>(
    api: &A,
    query: &ListingQuery,
) -> Result<Page<UserRecord>, ClientError> {
    let listing = api.list_users(query).await?;
    info!(
        page = query.page,
        rows = listing.users.len(),
        total_pages = listing.total_pages,
        "user page loaded"
    );
    Ok(Page {
        items: listing.users,
        total_pages: listing.total_pages,
    })
}

/// Choices offered by the create-bus form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusFormOptions {
    pub owners: Vec<UserRecord>,
    pub staff: Vec<UserRecord>,
    pub cities: Vec<CityRecord>,
}

/// Loads the three picker lists concurrently; a failed list is left empty.
pub async fn load_bus_form_options<A: AdminApi + ?Sized>(api: &A) -> BusFormOptions {
    let owner_query = ListingQuery::user_picker("Owner");
    let staff_query = ListingQuery::user_picker("Staff");
    let city_query = ListingQuery::city_picker();
    let (owners, staff, cities) = futures::join!(
        api.list_users(&owner_query),
        api.list_users(&staff_query),
        api.list_cities(&city_query),
    );

    BusFormOptions {
        owners: owners
            .map(|page| page.users)
            .unwrap_or_else(|err| {
                warn!("failed to load owners: {err}");
                Vec::new()
            }),
        staff: staff
            .map(|page| page.users)
            .unwrap_or_else(|err| {
                warn!("failed to load staff: {err}");
                Vec::new()
            }),
        cities: cities
            .map(|page| page.cities)
            .unwrap_or_else(|err| {
                warn!("failed to load cities: {err}");
                Vec::new()
            }),
    }
}
