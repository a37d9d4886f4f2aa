//! The JSON schedule document the CLI reads.
//!
//! ```json
//! {
//!   "users": [
//!     {
//!       "user_id": "user123",
//!       "availability": [
//!         { "start_time": "2026-03-16T09:00:00Z", "end_time": "2026-03-16T11:00:00Z" },
//!         { "start_time": "2026-03-20T09:00:00Z", "end_time": "2026-03-20T10:00:00Z", "recurrence": "weekdays" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use availability_core::{AvailabilityService, Clock, SetOutcome, SlotRequest};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default)]
    pub users: Vec<UserAvailability>,
}

/// One `setAvailability` request: a user and the slots to add.
#[derive(Debug, Deserialize)]
pub struct UserAvailability {
    pub user_id: String,
    #[serde(default)]
    pub availability: Vec<SlotRequest>,
}

impl ScheduleDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse schedule document")
    }

    /// Feed every user's slots through `set_availability`, in document order.
    ///
    /// Returns each user's outcome. Stops at the first user whose slots are rejected.
    pub fn load_into<C: Clock>(
        &self,
        service: &AvailabilityService<C>,
    ) -> Result<Vec<(String, SetOutcome)>> {
        let mut outcomes = Vec::with_capacity(self.users.len());
        for user in &self.users {
            let outcome = service
                .set_availability(&user.user_id, &user.availability)
                .with_context(|| {
                    format!("Failed to set availability for user {:?}", user.user_id)
                })?;
            info!(
                user_id = %user.user_id,
                inserted = outcome.inserted,
                duplicates = outcome.duplicates,
                "loaded availability"
            );
            outcomes.push((user.user_id.clone(), outcome));
        }
        Ok(outcomes)
    }
}
