use serde::{Deserialize, Serialize};

/// Dashboard counters, recomputed from the stores on every call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_users: usize,
    pub active_users: usize,
    pub total_alerts: usize,
    pub active_alerts: usize,
    pub total_incidents: usize,
    pub resolved_incidents: usize,
    pub total_safe_zones: usize,
}

impl Statistics {
    /// Every sub-count is bounded by its total.
    pub fn is_consistent(&self) -> bool {
        self.active_users <= self.total_users
            && self.active_alerts <= self.total_alerts
            && self.resolved_incidents <= self.total_incidents
    }
}
