use serde::{Deserialize, Serialize};

use crate::domain::{BusRecord, CityId, CityRecord, UserId, UserRecord};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusListResponse {
    #[serde(default)]
    pub buses: Vec<BusRecord>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityListResponse {
    #[serde(default)]
    pub cities: Vec<CityRecord>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Body of `GET /api/users/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserLookupResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl UserLookupResponse {
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }
}

/// Body of `GET /api/cities/city/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityLookupResponse {
    #[serde(default)]
    pub city: Option<CityLookupBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityLookupBody {
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub city_pincode: Option<String>,
}

impl CityLookupResponse {
    pub fn display_name(&self) -> Option<&str> {
        self.city
            .as_ref()
            .and_then(|city| non_blank(city.city_name.as_deref()))
    }
}

/// Body of `POST /api/bus/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusRequest {
    pub bus_id: String,
    pub bus_number: String,
    pub owner_id: UserId,
    pub staff: Vec<UserId>,
    pub bus_capacity: u32,
    pub seats: Vec<String>,
    pub source: CityId,
    pub destination: CityId,
    pub rest_stops: Vec<CityId>,
}

/// Stop as submitted with a new city; duration travels as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCityStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_timings: String,
    pub stop_duration: u32,
}

/// Body of `POST /api/cities/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityRequest {
    pub city_name: String,
    pub city_pincode: String,
    pub stops: Vec<NewCityStop>,
}

/// Stop appended to an existing city; the endpoint expects the duration as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPatch {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_timings: String,
    pub stop_duration: String,
}

/// Body of `PATCH /api/cities/add-stops/{pincode}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStopsRequest {
    pub stops: Vec<StopPatch>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
