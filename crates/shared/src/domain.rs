use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        /// A `null` id decodes as a blank id.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = Option::<String>::deserialize(deserializer)?;
                Ok(Self(value.unwrap_or_default()))
            }
        }

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(RecordId);
id_newtype!(UserId);
id_newtype!(CityId);

/// Display text substituted when an owner reference cannot be resolved.
pub const UNKNOWN_OWNER: &str = "Unknown Owner";
/// Display text substituted when a city reference cannot be resolved.
pub const UNKNOWN_CITY: &str = "Unknown City";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "Sort Ascending",
            SortOrder::Desc => "Sort Descending",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusRecord {
    #[serde(rename = "_id", default)]
    pub record_id: RecordId,
    #[serde(default)]
    pub bus_id: String,
    #[serde(default)]
    pub bus_number: String,
    #[serde(default)]
    pub owner_id: UserId,
    #[serde(default, deserialize_with = "vec_or_null")]
    pub staff: Vec<UserId>,
    #[serde(default)]
    pub bus_capacity: u32,
    #[serde(default, deserialize_with = "vec_or_null")]
    pub seats: Vec<String>,
    #[serde(default)]
    pub source: CityId,
    #[serde(default)]
    pub destination: CityId,
    #[serde(default, deserialize_with = "vec_or_null")]
    pub rest_stops: Vec<CityId>,
    #[serde(default)]
    pub earning_per_day: f64,
}

/// A bus row with every reference id replaced by display text.
///
/// `rest_stops_cities[i]` always names `bus.rest_stops[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedBus {
    #[serde(flatten)]
    pub bus: BusRecord,
    pub owner_name: String,
    pub source_city: String,
    pub destination_city: String,
    pub rest_stops_cities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default)]
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: String,
    #[serde(default)]
    pub stop_timings: String,
    #[serde(default, deserialize_with = "minutes_from_number_or_string")]
    pub stop_duration: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    #[serde(rename = "_id", default)]
    pub record_id: RecordId,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub city_pincode: String,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CityRecord {
    /// Bus documents reference cities by pincode.
    pub fn city_ref(&self) -> CityId {
        CityId(self.city_pincode.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id", default)]
    pub record_id: RecordId,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub active: bool,
}

impl UserRecord {
    pub fn id(&self) -> UserId {
        UserId(self.record_id.0.clone())
    }

    /// Picker label: the display name, or the username when the name is blank.
    pub fn picker_label(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

fn vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn minutes_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Minutes {
        Missing,
        Number(u32),
        Float(f64),
        Text(String),
    }

    match Minutes::deserialize(deserializer)? {
        Minutes::Missing => Ok(0),
        Minutes::Number(value) => Ok(value),
        Minutes::Float(value) if value >= 0.0 => Ok(value as u32),
        Minutes::Float(value) => Err(serde::de::Error::custom(format!(
            "negative stop duration {value}"
        ))),
        Minutes::Text(text) if text.trim().is_empty() => Ok(0),
        Minutes::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|err| serde::de::Error::custom(format!("stop duration '{text}': {err}"))),
    }
}
