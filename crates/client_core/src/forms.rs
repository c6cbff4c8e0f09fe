//! Create-bus, create-city, and add-stop form state with client-side checks.

use chrono::NaiveTime;
use shared::{
    domain::{CityId, CityRecord, UserId, UserRecord},
    protocol::{CreateBusRequest, CreateCityRequest, NewCityStop, StopPatch},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select an owner.")]
    MissingOwner,
    #[error("Bus number is required.")]
    MissingBusNumber,
    #[error("Bus capacity must be greater than zero.")]
    InvalidCapacity,
    #[error("Please select a source stop.")]
    MissingSource,
    #[error("Please select a destination stop.")]
    MissingDestination,
    #[error("City Name is required.")]
    MissingCityName,
    #[error("City Pincode must be a 6-digit number.")]
    InvalidPincode,
    #[error("Please fill out all fields for the stop.")]
    IncompleteStop,
    #[error("Stop timings must use the HH:MM format.")]
    InvalidStopTimings,
}

/// Bus ids are the trimmed bus number with whitespace runs replaced by `_`.
pub fn bus_id_from_number(bus_number: &str) -> String {
    bus_number.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Stop ids submitted with a new city: lowercase, whitespace runs replaced by `-`.
pub fn city_stop_id(stop_name: &str) -> String {
    slug(stop_name, "-")
}

/// Stop ids for stops appended to an existing city: lowercase, whitespace runs replaced by `_`.
pub fn added_stop_id(stop_name: &str) -> String {
    slug(stop_name, "_")
}

fn slug(value: &str, separator: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_whitespace = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push_str(separator);
            }
            in_whitespace = true;
        } else {
            out.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }
    out
}

pub fn is_valid_pincode(pincode: &str) -> bool {
    pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCity {
    pub id: CityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedUser {
    pub id: UserId,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusForm {
    pub owner_id: Option<UserId>,
    pub bus_number: String,
    pub bus_capacity: u32,
    pub source: Option<CityId>,
    pub destination: Option<CityId>,
    pub rest_stops: Vec<SelectedCity>,
    pub staff: Vec<SelectedUser>,
}

impl BusForm {
    /// Returns false when the city is already a rest stop.
    pub fn add_rest_stop(&mut self, city: &CityRecord) -> bool {
        self.select_rest_stop(SelectedCity {
            id: city.city_ref(),
            name: city.city_name.clone(),
        })
    }

    pub fn select_rest_stop(&mut self, stop: SelectedCity) -> bool {
        if self.rest_stops.iter().any(|selected| selected.id == stop.id) {
            return false;
        }
        self.rest_stops.push(stop);
        true
    }

    pub fn remove_rest_stop(&mut self, id: &CityId) {
        self.rest_stops.retain(|stop| &stop.id != id);
    }

    /// Returns false when the user is already assigned.
    pub fn add_staff(&mut self, user: &UserRecord) -> bool {
        self.select_staff(SelectedUser {
            id: user.id(),
            label: user.picker_label().to_string(),
        })
    }

    pub fn select_staff(&mut self, member: SelectedUser) -> bool {
        if self.staff.iter().any(|selected| selected.id == member.id) {
            return false;
        }
        self.staff.push(member);
        true
    }

    pub fn remove_staff(&mut self, id: &UserId) {
        self.staff.retain(|member| &member.id != id);
    }

    pub fn to_request(&self) -> Result<CreateBusRequest, FormError> {
        let owner_id = self
            .owner_id
            .clone()
            .filter(|id| !id.is_blank())
            .ok_or(FormError::MissingOwner)?;
        let bus_number = self.bus_number.trim();
        if bus_number.is_empty() {
            return Err(FormError::MissingBusNumber);
        }
        if self.bus_capacity == 0 {
            return Err(FormError::InvalidCapacity);
        }
        let source = self
            .source
            .clone()
            .filter(|id| !id.is_blank())
            .ok_or(FormError::MissingSource)?;
        let destination = self
            .destination
            .clone()
            .filter(|id| !id.is_blank())
            .ok_or(FormError::MissingDestination)?;

        Ok(CreateBusRequest {
            bus_id: bus_id_from_number(bus_number),
            bus_number: bus_number.to_string(),
            owner_id,
            staff: self.staff.iter().map(|member| member.id.clone()).collect(),
            bus_capacity: self.bus_capacity,
            seats: Vec::new(),
            source,
            destination,
            rest_stops: self.rest_stops.iter().map(|stop| stop.id.clone()).collect(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopDraft {
    pub stop_name: String,
    pub stop_timings: String,
    pub stop_duration: u32,
}

impl StopDraft {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.stop_name.trim().is_empty()
            || self.stop_timings.trim().is_empty()
            || self.stop_duration == 0
        {
            return Err(FormError::IncompleteStop);
        }
        NaiveTime::parse_from_str(self.stop_timings.trim(), "%H:%M")
            .map_err(|_| FormError::InvalidStopTimings)?;
        Ok(())
    }

    /// Payload for `PATCH /api/cities/add-stops/{pincode}`.
    pub fn to_patch(&self) -> Result<StopPatch, FormError> {
        self.validate()?;
        let stop_name = self.stop_name.trim();
        Ok(StopPatch {
            stop_id: added_stop_id(stop_name),
            stop_name: stop_name.to_string(),
            stop_timings: self.stop_timings.trim().to_string(),
            stop_duration: self.stop_duration.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityForm {
    pub city_name: String,
    pub city_pincode: String,
    pub stops: Vec<StopDraft>,
    pub draft: StopDraft,
}

impl CityForm {
    /// Moves the draft into the stop list once it is complete.
    pub fn add_draft_stop(&mut self) -> Result<(), FormError> {
        self.draft.validate()?;
        let draft = std::mem::take(&mut self.draft);
        self.stops.push(draft);
        Ok(())
    }

    pub fn remove_stop(&mut self, index: usize) {
        if index < self.stops.len() {
            self.stops.remove(index);
        }
    }

    pub fn to_request(&self) -> Result<CreateCityRequest, FormError> {
        let city_name = self.city_name.trim();
        if city_name.is_empty() {
            return Err(FormError::MissingCityName);
        }
        if !is_valid_pincode(&self.city_pincode) {
            return Err(FormError::InvalidPincode);
        }

        Ok(CreateCityRequest {
            city_name: city_name.to_string(),
            city_pincode: self.city_pincode.clone(),
            stops: self
                .stops
                .iter()
                .map(|stop| NewCityStop {
                    stop_id: city_stop_id(stop.stop_name.trim()),
                    stop_name: stop.stop_name.trim().to_string(),
                    stop_timings: stop.stop_timings.trim().to_string(),
                    stop_duration: stop.stop_duration,
                })
                .collect(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
