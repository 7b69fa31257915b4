pub mod http;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfirmation {
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub event_id: Option<String>,
}

/// The external calendar capability. Both calls are synchronous from
/// the dialogue core's perspective and carry no transactional guarantee
/// between them: a slot reported free may be gone by booking time, and
/// that surfaces as an error from `create_booking`.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Free slots on `date` as ascending, deduplicated `HH:MM` strings.
    async fn list_available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> anyhow::Result<Vec<String>>;

    async fn create_booking(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        title: &str,
        duration_minutes: u32,
    ) -> anyhow::Result<SlotConfirmation>;
}
