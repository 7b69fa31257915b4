use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub calendar_api_url: String,
    pub calendar_api_token: String,
    pub slot_duration_minutes: u32,
    pub booking_title: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            calendar_api_url: env::var("CALENDAR_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            calendar_api_token: env::var("CALENDAR_API_TOKEN").unwrap_or_default(),
            slot_duration_minutes: env::var("SLOT_DURATION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            booking_title: env::var("BOOKING_TITLE").unwrap_or_else(|_| "Meeting".to_string()),
        }
    }
}
