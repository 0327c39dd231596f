//! Inbound navigation events and their callback-data encoding.

use std::fmt;

const DISTRICT_PREFIX: &str = "district_";
const ROUTE_PREFIX: &str = "route_";
const BACK_TO_DISTRICTS: &str = "back_to_districts";

/// Telegram rejects inline buttons whose callback data exceeds this many bytes.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    SelectDistrict(String),
    SelectRoute(String),
    BackToDistricts,
    Unrecognized(String),
}

impl Event {
    pub fn from_callback_data(data: &str) -> Self {
        if data == BACK_TO_DISTRICTS {
            Self::BackToDistricts
        } else if let Some(name) = data.strip_prefix(DISTRICT_PREFIX) {
            Self::SelectDistrict(name.to_string())
        } else if let Some(id) = data.strip_prefix(ROUTE_PREFIX) {
            Self::SelectRoute(id.to_string())
        } else {
            Self::Unrecognized(data.to_string())
        }
    }

    /// Callback payload for a button that triggers this event.
    ///
    /// `Start` and `Unrecognized` are never attached to buttons and encode to
    /// their raw form.
    pub fn callback_data(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "/start"),
            Self::SelectDistrict(name) => write!(f, "{DISTRICT_PREFIX}{name}"),
            Self::SelectRoute(id) => write!(f, "{ROUTE_PREFIX}{id}"),
            Self::BackToDistricts => write!(f, "{BACK_TO_DISTRICTS}"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}
