//! Tourist Safety Core
//!
//! In-memory records for the tourist safety platform: users, alerts,
//! incidents and safe zones, with haversine proximity lookup, live
//! statistics and an async facade that wraps every call in a uniform
//! envelope.
//!
//! # Layers
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | Distance | [`geo`] | Haversine great-circle distance |
//! | Storage | [`store`] | Ordered collection with a dedicated id counter |
//! | Service | [`service`] | Four stores, seed data, one lock per kind |
//! | Facade | [`api`] | Envelope + optional simulated latency |
//! | Events | [`events`] | Pub/sub bus and random event sources |

use thiserror::Error;

pub mod api;
pub mod events;
pub mod geo;
pub mod model;
pub mod service;
pub mod stats;
pub mod store;

pub use api::{Envelope, SafetyApi};
pub use geo::{haversine_km, DEFAULT_RADIUS_KM};
pub use model::{
    Alert, AlertKind, AlertStatus, Incident, IncidentStatus, NewAlert, NewIncident, NewUser, Role,
    SafeZone, User, UserPatch, UserStatus, ZoneCategory,
};
pub use service::SafetyService;
pub use stats::Statistics;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SafetyError {
    #[error("User not found: {0}")]
    UserNotFound(u64),
    #[error("Alert not found: {0}")]
    AlertNotFound(u64),
    #[error("Incident not found: {0}")]
    IncidentNotFound(String),
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },
}

impl SafetyError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::AlertNotFound(_) | Self::IncidentNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SafetyError>;

/// Presence check for a required text field.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SafetyError::Validation { field });
    }
    Ok(())
}
