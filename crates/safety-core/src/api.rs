//! Async facade over [`SafetyService`]
//!
//! Every call resolves to an [`Envelope`] after an optional fixed delay
//! that mimics a network round trip for dashboard demos. Pass `None` as the
//! latency to skip the delay entirely.
//!
//! # Usage
//!
//! ```rust,ignore
//! let api = SafetyApi::new(Arc::new(SafetyService::with_seed_data()))
//!     .with_latency(Some(SafetyApi::DEMO_LATENCY));
//! let users = api.get_users().await.data;
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{
    Alert, AlertStatus, Incident, IncidentStatus, NewAlert, NewIncident, NewUser, SafeZone, User,
    UserPatch,
};
use crate::service::SafetyService;
use crate::stats::Statistics;
use crate::{Result, SafetyError};

/// Uniform success wrapper returned by every facade call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Clone)]
pub struct SafetyApi {
    service: Arc<SafetyService>,
    latency: Option<Duration>,
}

impl SafetyApi {
    /// Round-trip delay used by dashboard demos
    pub const DEMO_LATENCY: Duration = Duration::from_millis(300);

    /// Facade without simulated latency.
    pub fn new(service: Arc<SafetyService>) -> Self {
        Self {
            service,
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Option<Duration>) -> Self {
        self.latency = latency.filter(|d| !d.is_zero());
        self
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    async fn settle(&self) {
        if let Some(delay) = self.latency {
            tokio::time::sleep(delay).await;
        }
    }

    // ========== Users ==========

    pub async fn get_users(&self) -> Envelope<Vec<User>> {
        self.settle().await;
        Envelope::ok(self.service.users())
    }

    pub async fn get_user(&self, id: u64) -> Result<Envelope<User>> {
        self.settle().await;
        let user = self.service.user(id).ok_or(SafetyError::UserNotFound(id))?;
        Ok(Envelope::ok(user))
    }

    pub async fn create_user(&self, new: NewUser) -> Result<Envelope<User>> {
        self.settle().await;
        let user = self.service.create_user(new)?;
        Ok(Envelope::ok(user).with_message("User created successfully"))
    }

    pub async fn update_user(&self, id: u64, patch: UserPatch) -> Result<Envelope<User>> {
        self.settle().await;
        let user = self
            .service
            .update_user(id, patch)
            .ok_or(SafetyError::UserNotFound(id))?;
        Ok(Envelope::ok(user).with_message("User updated successfully"))
    }

    pub async fn delete_user(&self, id: u64) -> Result<Envelope<User>> {
        self.settle().await;
        let user = self
            .service
            .delete_user(id)
            .ok_or(SafetyError::UserNotFound(id))?;
        Ok(Envelope::ok(user).with_message("User deleted successfully"))
    }

    // ========== Alerts ==========

    pub async fn get_alerts(&self) -> Envelope<Vec<Alert>> {
        self.settle().await;
        Envelope::ok(self.service.alerts())
    }

    pub async fn get_alert(&self, id: u64) -> Result<Envelope<Alert>> {
        self.settle().await;
        let alert = self.service.alert(id).ok_or(SafetyError::AlertNotFound(id))?;
        Ok(Envelope::ok(alert))
    }

    pub async fn create_alert(&self, new: NewAlert) -> Result<Envelope<Alert>> {
        self.settle().await;
        let alert = self.service.create_alert(new)?;
        Ok(Envelope::ok(alert).with_message("Alert created successfully"))
    }

    pub async fn update_alert_status(&self, id: u64, status: AlertStatus) -> Result<Envelope<Alert>> {
        self.settle().await;
        let alert = self
            .service
            .update_alert_status(id, status)
            .ok_or(SafetyError::AlertNotFound(id))?;
        Ok(Envelope::ok(alert).with_message("Alert updated successfully"))
    }

    pub async fn delete_alert(&self, id: u64) -> Result<Envelope<Alert>> {
        self.settle().await;
        let alert = self
            .service
            .delete_alert(id)
            .ok_or(SafetyError::AlertNotFound(id))?;
        Ok(Envelope::ok(alert).with_message("Alert deleted successfully"))
    }

    // ========== Incidents ==========

    pub async fn get_incidents(&self) -> Envelope<Vec<Incident>> {
        self.settle().await;
        Envelope::ok(self.service.incidents())
    }

    pub async fn get_incident(&self, id: &str) -> Result<Envelope<Incident>> {
        self.settle().await;
        let incident = self
            .service
            .incident(id)
            .ok_or_else(|| SafetyError::IncidentNotFound(id.to_string()))?;
        Ok(Envelope::ok(incident))
    }

    pub async fn create_incident(&self, new: NewIncident) -> Result<Envelope<Incident>> {
        self.settle().await;
        let incident = self.service.create_incident(new)?;
        Ok(Envelope::ok(incident).with_message("Incident created successfully"))
    }

    pub async fn update_incident_status(
        &self,
        id: &str,
        status: IncidentStatus,
    ) -> Result<Envelope<Incident>> {
        self.settle().await;
        let incident = self
            .service
            .update_incident_status(id, status)
            .ok_or_else(|| SafetyError::IncidentNotFound(id.to_string()))?;
        Ok(Envelope::ok(incident).with_message("Incident updated successfully"))
    }

    pub async fn delete_incident(&self, id: &str) -> Result<Envelope<Incident>> {
        self.settle().await;
        let incident = self
            .service
            .delete_incident(id)
            .ok_or_else(|| SafetyError::IncidentNotFound(id.to_string()))?;
        Ok(Envelope::ok(incident).with_message("Incident deleted successfully"))
    }

    // ========== Safe zones & statistics ==========

    pub async fn get_safe_zones(&self) -> Envelope<Vec<SafeZone>> {
        self.settle().await;
        Envelope::ok(self.service.safe_zones())
    }

    pub async fn get_nearby_safe_zones(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
    ) -> Envelope<Vec<SafeZone>> {
        self.settle().await;
        Envelope::ok(self.service.nearby_safe_zones(lat, lon, radius_km))
    }

    pub async fn get_statistics(&self) -> Envelope<Statistics> {
        self.settle().await;
        Envelope::ok(self.service.statistics())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn api() -> SafetyApi {
        SafetyApi::new(Arc::new(SafetyService::with_seed_data()))
    }

    #[tokio::test]
    async fn test_create_user_envelope() {
        let api = api();
        let env = api
            .create_user(NewUser {
                name: "X".into(),
                email: "x@x.com".into(),
                role: Role::Tourist,
            })
            .await
            .unwrap();

        assert!(env.success);
        assert_eq!(env.data.id, 4);
        assert_eq!(env.message.as_deref(), Some("User created successfully"));
        assert_eq!(api.get_users().await.data.len(), 4);
    }

    #[tokio::test]
    async fn test_list_envelope_has_no_message() {
        let env = api().get_statistics().await;
        assert!(env.success);
        assert!(env.message.is_none());

        let json = serde_json::to_value(&env).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["data"]["totalUsers"], 3);
    }

    #[tokio::test]
    async fn test_not_found_is_an_error() {
        let api = api();
        assert_eq!(
            api.get_user(99).await.unwrap_err(),
            SafetyError::UserNotFound(99)
        );
        assert_eq!(
            api.delete_incident("#INC404").await.unwrap_err(),
            SafetyError::IncidentNotFound("#INC404".into())
        );
        assert_eq!(
            api.update_alert_status(7, AlertStatus::Resolved).await.unwrap_err(),
            SafetyError::AlertNotFound(7)
        );
    }

    #[tokio::test]
    async fn test_create_incident_envelope() {
        let env = api()
            .create_incident(NewIncident {
                kind: "Fire".into(),
                location: "Red Fort".into(),
            })
            .await
            .unwrap();
        assert_eq!(env.data.id, "#INC003");
        assert_eq!(env.message.as_deref(), Some("Incident created successfully"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_latency() {
        let api = api().with_latency(Some(SafetyApi::DEMO_LATENCY));
        let start = tokio::time::Instant::now();

        api.get_safe_zones().await;
        assert!(start.elapsed() >= SafetyApi::DEMO_LATENCY);
    }

    #[test]
    fn test_zero_latency_disables_delay() {
        let api = api().with_latency(Some(Duration::ZERO));
        assert!(api.latency().is_none());
    }
}
