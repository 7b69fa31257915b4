use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BookAppointment,
    CheckAvailability,
    #[default]
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BookAppointment => "book_appointment",
            Intent::CheckAvailability => "check_availability",
            Intent::Unknown => "unknown",
        }
    }
}

/// One conversation turn's worth of state. The caller holds this value
/// between turns and passes it back in; the process keeps nothing.
///
/// `messages[0]` is the triggering user utterance for a fresh state;
/// everything after it is a system response, in emission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueState {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub intent: Intent,
    /// ISO `YYYY-MM-DD`, validated before storing.
    #[serde(default)]
    pub date: Option<String>,
    /// Zero-padded 24h `HH:MM`, validated before storing.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub retry_count: u32,
    /// Near-miss slot offered by a failed booking attempt, waiting for
    /// an affirmative reply. Never set while `confirmed` is true.
    #[serde(default)]
    pub suggested_time: Option<String>,
}

impl DialogueState {
    pub fn seeded(utterance: &str) -> Self {
        Self {
            messages: vec![utterance.to_string()],
            ..Self::default()
        }
    }

    pub fn latest_message(&self) -> &str {
        self.messages.last().map(|m| m.as_str()).unwrap_or("")
    }
}
