//! UI/backend events and error modeling for the console controller.

use client_core::{BusFormOptions, Page};
use shared::domain::{CityRecord, EnrichedBus, UserRecord};

pub type PageResult<T> = Result<Page<T>, UiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    CreateBus,
    CreateCity,
    AddStop { pincode: String },
    DeleteStop { pincode: String, stop_id: String },
}

impl MutationKind {
    pub fn success_message(&self) -> String {
        match self {
            MutationKind::CreateBus => "Bus added successfully".to_string(),
            MutationKind::CreateCity => "City created successfully".to_string(),
            MutationKind::AddStop { pincode } => format!("Stop added to {pincode}"),
            MutationKind::DeleteStop { stop_id, .. } => format!("Stop {stop_id} removed"),
        }
    }
}

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    BusPage {
        generation: u64,
        result: PageResult<EnrichedBus>,
    },
    CityPage {
        generation: u64,
        result: PageResult<CityRecord>,
    },
    UserPage {
        generation: u64,
        result: PageResult<UserRecord>,
    },
    BusFormOptionsLoaded(BusFormOptions),
    MutationFinished {
        kind: MutationKind,
        result: Result<(), UiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Listing,
    Mutation,
    General,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("request to")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("required")
            || message_lower.contains("please")
            || message_lower.contains("must")
            || message_lower.contains("invalid")
            || message_lower.contains("malformed")
            || message_lower.contains("400 bad request")
            || message_lower.contains("409 conflict")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }
}
