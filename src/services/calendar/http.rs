use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use super::{CalendarProvider, SlotConfirmation};
use crate::services::agent::temporal;

/// Client for the calendar backend's JSON API.
pub struct HttpCalendarProvider {
    base_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl HttpCalendarProvider {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            base_url,
            api_token,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    slots: Vec<String>,
}

#[derive(Deserialize)]
struct BookingResponse {
    scheduled_date: String,
    scheduled_time: String,
    event_id: Option<String>,
}

#[async_trait]
impl CalendarProvider for HttpCalendarProvider {
    async fn list_available_slots(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> anyhow::Result<Vec<String>> {
        let resp = self
            .client
            .get(format!("{}/availability", self.base_url))
            .bearer_auth(&self.api_token)
            .query(&[
                ("date", date.format("%Y-%m-%d").to_string()),
                ("duration", duration_minutes.to_string()),
            ])
            .send()
            .await
            .context("failed to reach calendar backend")?
            .error_for_status()
            .context("calendar backend rejected availability request")?;

        let data: AvailabilityResponse = resp
            .json()
            .await
            .context("failed to parse availability response")?;

        // Normalize: drop anything that isn't HH:MM, sort, dedup.
        let mut slots: Vec<String> = data
            .slots
            .into_iter()
            .filter(|s| temporal::parse_hhmm(s).is_some())
            .collect();
        slots.sort();
        slots.dedup();
        Ok(slots)
    }

    async fn create_booking(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        title: &str,
        duration_minutes: u32,
    ) -> anyhow::Result<SlotConfirmation> {
        let body = json!({
            "date": date.format("%Y-%m-%d").to_string(),
            "time": time.format("%H:%M").to_string(),
            "title": title,
            "duration_minutes": duration_minutes,
        });

        let resp = self
            .client
            .post(format!("{}/bookings", self.base_url))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .context("failed to reach calendar backend")?
            .error_for_status()
            .context("calendar backend rejected booking request")?;

        let data: BookingResponse = resp
            .json()
            .await
            .context("failed to parse booking response")?;

        Ok(SlotConfirmation {
            scheduled_date: data.scheduled_date,
            scheduled_time: data.scheduled_time,
            event_id: data.event_id,
        })
    }
}
