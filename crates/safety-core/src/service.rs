//! Safety Service
//!
//! Owns the four record stores and their seed data. Each entity kind has
//! its own lock so creates serialise id assignment per kind; no lock is
//! held across an await point.

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::geo::{self, DEFAULT_RADIUS_KM};
use crate::model::{
    Alert, AlertKind, AlertStatus, Incident, IncidentStatus, NewAlert, NewIncident, NewUser, Role,
    SafeZone, User, UserPatch, UserStatus, ZoneCategory,
};
use crate::stats::Statistics;
use crate::store::{EntityStore, Placement};
use crate::{require, Result};

/// Label stamped on newly reported incidents
pub const JUST_NOW: &str = "Just now";

pub struct SafetyService {
    users: RwLock<EntityStore<User>>,
    alerts: RwLock<EntityStore<Alert>>,
    incidents: RwLock<EntityStore<Incident>>,
    safe_zones: RwLock<EntityStore<SafeZone>>,
}

impl SafetyService {
    /// Service pre-loaded with the demo dataset. Identical on every start.
    pub fn with_seed_data() -> Self {
        let now = Utc::now();

        let users = vec![
            seed_user(1, "Amit Sharma", "amit.sharma@police.gov.in", Role::Police),
            seed_user(2, "Priya Kumar", "priya.kumar@tourism.gov.in", Role::Admin),
            seed_user(3, "Rahul Jain", "rahul.jain@example.com", Role::Tourist),
        ];

        let alerts = vec![
            Alert {
                id: 1,
                kind: AlertKind::Emergency,
                message: "Medical emergency near Taj Mahal".to_string(),
                location: "Taj Mahal, Agra".to_string(),
                timestamp: now,
                status: AlertStatus::Active,
            },
            Alert {
                id: 2,
                kind: AlertKind::Warning,
                message: "Heavy traffic on Delhi-Jaipur highway".to_string(),
                location: "Delhi-Jaipur Highway".to_string(),
                timestamp: now,
                status: AlertStatus::Active,
            },
        ];

        let incidents = vec![
            seed_incident(1, "Medical", "Taj Mahal, Agra", IncidentStatus::Active, "2 min ago"),
            seed_incident(2, "Theft", "Connaught Place, Delhi", IncidentStatus::Resolved, "1 hour ago"),
        ];

        let safe_zones = vec![
            seed_zone("Central Police Station", 28.6139, 77.2090, ZoneCategory::Police),
            seed_zone("City Hospital", 28.7041, 77.1025, ZoneCategory::Medical),
            seed_zone("Tourist Information Center", 28.5355, 77.3910, ZoneCategory::Information),
            seed_zone("Emergency Shelter", 28.4595, 77.0266, ZoneCategory::Shelter),
        ];

        info!(
            users = users.len(),
            alerts = alerts.len(),
            incidents = incidents.len(),
            safe_zones = safe_zones.len(),
            "Seeded safety service"
        );

        Self {
            users: RwLock::new(EntityStore::seeded(Placement::Append, users)),
            alerts: RwLock::new(EntityStore::seeded(Placement::Prepend, alerts)),
            incidents: RwLock::new(EntityStore::seeded(Placement::Prepend, incidents)),
            safe_zones: RwLock::new(EntityStore::seeded(Placement::Append, safe_zones)),
        }
    }

    // ========== Users ==========

    pub fn users(&self) -> Vec<User> {
        self.users.read().list()
    }

    pub fn user(&self, id: u64) -> Option<User> {
        self.users.read().get(&id)
    }

    pub fn create_user(&self, new: NewUser) -> Result<User> {
        require("name", &new.name)?;
        require("email", &new.email)?;

        let user = self.users.write().insert_with(|id| User {
            id,
            name: new.name,
            email: new.email,
            role: new.role,
            status: UserStatus::Active,
            created_at: Some(Utc::now()),
        });
        debug!(id = user.id, role = ?user.role, "Created user");
        Ok(user)
    }

    pub fn update_user(&self, id: u64, patch: UserPatch) -> Option<User> {
        self.users.write().update(&id, |user| patch.apply(user))
    }

    pub fn delete_user(&self, id: u64) -> Option<User> {
        self.users.write().remove(&id)
    }

    // ========== Alerts ==========

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().list()
    }

    pub fn alert(&self, id: u64) -> Option<Alert> {
        self.alerts.read().get(&id)
    }

    pub fn create_alert(&self, new: NewAlert) -> Result<Alert> {
        require("message", &new.message)?;
        require("location", &new.location)?;

        let alert = self.alerts.write().insert_with(|id| Alert {
            id,
            kind: new.kind,
            message: new.message,
            location: new.location,
            timestamp: Utc::now(),
            status: AlertStatus::Active,
        });
        debug!(id = alert.id, kind = ?alert.kind, "Created alert");
        Ok(alert)
    }

    pub fn update_alert_status(&self, id: u64, status: AlertStatus) -> Option<Alert> {
        self.alerts.write().update(&id, |alert| alert.status = status)
    }

    pub fn delete_alert(&self, id: u64) -> Option<Alert> {
        self.alerts.write().remove(&id)
    }

    // ========== Incidents ==========

    pub fn incidents(&self) -> Vec<Incident> {
        self.incidents.read().list()
    }

    pub fn incident(&self, id: &str) -> Option<Incident> {
        self.incidents.read().get(&id.to_string())
    }

    pub fn create_incident(&self, new: NewIncident) -> Result<Incident> {
        require("type", &new.kind)?;
        require("location", &new.location)?;

        let incident = self.incidents.write().insert_with(|seq| Incident {
            id: Incident::format_id(seq),
            kind: new.kind,
            location: new.location,
            status: IncidentStatus::Active,
            time: JUST_NOW.to_string(),
        });
        debug!(id = %incident.id, "Reported incident");
        Ok(incident)
    }

    pub fn update_incident_status(&self, id: &str, status: IncidentStatus) -> Option<Incident> {
        self.incidents
            .write()
            .update(&id.to_string(), |incident| incident.status = status)
    }

    pub fn delete_incident(&self, id: &str) -> Option<Incident> {
        self.incidents.write().remove(&id.to_string())
    }

    // ========== Safe zones ==========

    pub fn safe_zones(&self) -> Vec<SafeZone> {
        self.safe_zones.read().list()
    }

    /// Safe zones within `radius_km` (default 5 km) of the point, in seed order.
    pub fn nearby_safe_zones(&self, lat: f64, lon: f64, radius_km: Option<f64>) -> Vec<SafeZone> {
        let radius = radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        let zones = self.safe_zones.read();
        geo::within_radius(zones.iter(), lat, lon, radius)
    }

    // ========== Statistics ==========

    pub fn statistics(&self) -> Statistics {
        let users = self.users.read();
        let total_users = users.len();
        let active_users = users.count_where(|u| u.status == UserStatus::Active);
        drop(users);

        let alerts = self.alerts.read();
        let total_alerts = alerts.len();
        let active_alerts = alerts.count_where(|a| a.status == AlertStatus::Active);
        drop(alerts);

        let incidents = self.incidents.read();
        let total_incidents = incidents.len();
        let resolved_incidents = incidents.count_where(|i| i.status == IncidentStatus::Resolved);
        drop(incidents);

        Statistics {
            total_users,
            active_users,
            total_alerts,
            active_alerts,
            total_incidents,
            resolved_incidents,
            total_safe_zones: self.safe_zones.read().len(),
        }
    }
}

impl Default for SafetyService {
    fn default() -> Self {
        Self::with_seed_data()
    }
}

fn seed_user(id: u64, name: &str, email: &str, role: Role) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
        status: UserStatus::Active,
        created_at: None,
    }
}

fn seed_incident(seq: u64, kind: &str, location: &str, status: IncidentStatus, time: &str) -> Incident {
    Incident {
        id: Incident::format_id(seq),
        kind: kind.to_string(),
        location: location.to_string(),
        status,
        time: time.to_string(),
    }
}

fn seed_zone(name: &str, lat: f64, lon: f64, category: ZoneCategory) -> SafeZone {
    SafeZone {
        name: name.to_string(),
        location: [lat, lon],
        category,
    }
}
