pub mod actions;
pub mod intent;
pub mod router;
pub mod temporal;

use chrono::NaiveDateTime;

use crate::models::DialogueState;
use crate::services::calendar::CalendarProvider;
use self::router::Action;

/// Everything a single turn needs besides the state itself.
pub struct TurnContext<'a> {
    pub calendar: &'a dyn CalendarProvider,
    pub slot_duration_minutes: u32,
    pub booking_title: &'a str,
}

/// Run one dialogue turn: classify, extract, route, and execute exactly
/// one action node. Never fails; every failure path inside becomes an
/// appended response message.
///
/// With `prior` the turn continues an existing conversation (the caller
/// holds the state between turns); without it a fresh state is seeded
/// from the utterance alone. Returns the messages appended during this
/// call plus the updated state.
pub async fn process_turn(
    ctx: &TurnContext<'_>,
    utterance: &str,
    prior: Option<DialogueState>,
    now: NaiveDateTime,
) -> (Vec<String>, DialogueState) {
    let mut state = match prior {
        Some(mut prior) => {
            prior.messages.push(utterance.to_string());
            prior
        }
        None => DialogueState::seeded(utterance),
    };
    let base = state.messages.len();

    state.intent = intent::classify(utterance);
    state.retry_count += 1;

    let extraction = temporal::extract(utterance, now);
    if extraction.date.is_some() {
        state.date = extraction.date;
    }
    if extraction.time.is_some() {
        state.time = extraction.time;
    }
    state.messages.extend(extraction.warnings);

    let action = router::decide(&mut state);
    tracing::info!(
        intent = state.intent.as_str(),
        action = ?action,
        date = state.date.as_deref().unwrap_or("-"),
        time = state.time.as_deref().unwrap_or("-"),
        retry = state.retry_count,
        "routing turn"
    );

    match action {
        Action::Terminate => {}
        Action::CheckAvailability => actions::check_availability(&mut state, ctx).await,
        Action::BookSlot => actions::book_slot(&mut state, ctx).await,
        Action::HandleUnknown => actions::handle_unknown(&mut state),
    }

    // No turn ends silently, including a terminate on an already
    // confirmed state.
    if state.messages.len() == base {
        state
            .messages
            .push("You're all set. That appointment is already confirmed.".to_string());
    }

    let responses = state.messages[base..].to_vec();
    (responses, state)
}
