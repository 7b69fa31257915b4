use crate::models::{DialogueState, Intent};

/// What the turn does next. Exactly one decision per invocation; the
/// chosen node runs to completion and the turn ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Terminate,
    CheckAvailability,
    BookSlot,
    HandleUnknown,
}

// Deliberately a fixed token set; free-text acceptance of a suggested
// slot is not supported.
const AFFIRMATIVE_TOKENS: [&str; 4] = ["yes", "y", "ok", "sure"];

/// Route the current state to its action node.
///
/// Precedence: a confirmed state terminates; a pending slot suggestion
/// answered with an affirmative is promoted into `time` and booked; a
/// booking intent missing date or time detours through availability as
/// a clarifying step; otherwise intent maps directly.
pub fn decide(state: &mut DialogueState) -> Action {
    if state.confirmed {
        return Action::Terminate;
    }

    if let Some(suggested) = state.suggested_time.take() {
        let latest = state.latest_message().trim().to_lowercase();
        if AFFIRMATIVE_TOKENS.contains(&latest.as_str()) {
            state.time = Some(suggested);
            return Action::BookSlot;
        }
        // Not an acceptance; the offer stays on the table.
        state.suggested_time = Some(suggested);
    }

    match state.intent {
        Intent::BookAppointment => {
            if state.date.is_none() || state.time.is_none() {
                Action::CheckAvailability
            } else {
                Action::BookSlot
            }
        }
        Intent::CheckAvailability => Action::CheckAvailability,
        Intent::Unknown => Action::HandleUnknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(intent: Intent) -> DialogueState {
        DialogueState {
            intent,
            ..DialogueState::seeded("test")
        }
    }

    #[test]
    fn test_confirmed_always_terminates() {
        let mut state = state_with(Intent::BookAppointment);
        state.confirmed = true;
        state.date = Some("2025-07-01".to_string());
        state.time = Some("10:00".to_string());
        assert_eq!(decide(&mut state), Action::Terminate);
    }

    #[test]
    fn test_affirmative_promotes_suggestion() {
        let mut state = DialogueState::seeded("yes");
        state.suggested_time = Some("09:00".to_string());
        state.date = Some("2025-07-01".to_string());

        assert_eq!(decide(&mut state), Action::BookSlot);
        assert_eq!(state.time.as_deref(), Some("09:00"));
        assert!(state.suggested_time.is_none());
    }

    #[test]
    fn test_affirmative_tokens_case_insensitive() {
        for token in ["YES", "y", "Ok", " sure "] {
            let mut state = DialogueState::seeded(token);
            state.suggested_time = Some("09:00".to_string());
            assert_eq!(decide(&mut state), Action::BookSlot, "token {token:?}");
        }
    }

    #[test]
    fn test_non_affirmative_keeps_suggestion() {
        let mut state = state_with(Intent::Unknown);
        state.messages.push("no thanks".to_string());
        state.suggested_time = Some("09:00".to_string());

        assert_eq!(decide(&mut state), Action::HandleUnknown);
        assert_eq!(state.suggested_time.as_deref(), Some("09:00"));
        assert!(state.time.is_none());
    }

    #[test]
    fn test_book_intent_missing_slots_clarifies() {
        let mut state = state_with(Intent::BookAppointment);
        state.date = Some("2025-07-01".to_string());
        assert_eq!(decide(&mut state), Action::CheckAvailability);

        let mut state = state_with(Intent::BookAppointment);
        state.time = Some("10:00".to_string());
        assert_eq!(decide(&mut state), Action::CheckAvailability);
    }

    #[test]
    fn test_book_intent_complete_books() {
        let mut state = state_with(Intent::BookAppointment);
        state.date = Some("2025-07-01".to_string());
        state.time = Some("10:00".to_string());
        assert_eq!(decide(&mut state), Action::BookSlot);
    }

    #[test]
    fn test_availability_and_unknown() {
        assert_eq!(
            decide(&mut state_with(Intent::CheckAvailability)),
            Action::CheckAvailability
        );
        assert_eq!(decide(&mut state_with(Intent::Unknown)), Action::HandleUnknown);
    }
}
