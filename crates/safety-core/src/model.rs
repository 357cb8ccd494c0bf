//! Record types for users, alerts, incidents and safe zones.
//!
//! Wire names follow the dashboard's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Record;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Police,
    Admin,
    #[default]
    Tourist,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields accepted when registering a user. Status is always `active`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Partial user update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserPatch {
    pub(crate) fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Emergency,
    Warning,
    Info,
}

impl AlertKind {
    pub const ALL: [AlertKind; 3] = [Self::Emergency, Self::Warning, Self::Info];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    #[default]
    Active,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incident {
    /// `#INC` followed by a zero-padded sequence, e.g. `#INC003`
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub status: IncidentStatus,
    /// Relative label fixed at creation ("Just now"), never recomputed
    pub time: String,
}

impl Incident {
    pub fn format_id(seq: u64) -> String {
        format!("#INC{:03}", seq)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewIncident {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ZoneCategory {
    Police,
    Medical,
    Information,
    Shelter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafeZone {
    pub name: String,
    /// `[latitude, longitude]` in degrees
    pub location: [f64; 2],
    #[serde(rename = "type")]
    pub category: ZoneCategory,
}

impl SafeZone {
    pub fn latitude(&self) -> f64 {
        self.location[0]
    }

    pub fn longitude(&self) -> f64 {
        self.location[1]
    }
}

impl Record for User {
    type Id = u64;
    fn id(&self) -> &u64 {
        &self.id
    }
}

impl Record for Alert {
    type Id = u64;
    fn id(&self) -> &u64 {
        &self.id
    }
}

impl Record for Incident {
    type Id = String;
    fn id(&self) -> &String {
        &self.id
    }
}

impl Record for SafeZone {
    type Id = String;
    fn id(&self) -> &String {
        &self.name
    }
}
