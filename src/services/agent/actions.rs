use chrono::{NaiveTime, Timelike};

use super::{temporal, TurnContext};
use crate::models::DialogueState;

// Clarification prompts get blunter once the user has failed to land a
// parseable request this many times.
const ESCALATION_THRESHOLD: u32 = 2;

/// Show free slots for the extracted date, or ask for one. Also serves
/// as the clarifying step when a booking request is missing its date or
/// time.
pub async fn check_availability(state: &mut DialogueState, ctx: &TurnContext<'_>) {
    let Some(date_str) = state.date.clone() else {
        let prompt = if state.retry_count > ESCALATION_THRESHOLD {
            "I'm having trouble understanding the date. Could you give me something like 'tomorrow', 'Friday', or 'July 15th'?"
        } else {
            "Which day should I check? You can say 'tomorrow', 'Friday', or 'July 15th'."
        };
        state.messages.push(prompt.to_string());
        return;
    };

    let Some(date) = temporal::parse_iso_date(&date_str) else {
        state.date = None;
        state.messages.push(
            "That date didn't look right, so I've cleared it. Could you give the day again?"
                .to_string(),
        );
        return;
    };

    let slots = match ctx
        .calendar
        .list_available_slots(date, ctx.slot_duration_minutes)
        .await
    {
        Ok(slots) => slots,
        Err(e) => {
            tracing::error!(error = %e, date = %date_str, "availability lookup failed");
            state
                .messages
                .push(format!("Sorry, I couldn't check availability: {e:#}"));
            return;
        }
    };

    if slots.is_empty() {
        state.messages.push(format!(
            "Sorry, I'm fully booked on {date_str}. Would you like to try another day?"
        ));
        return;
    }

    let mut morning = Vec::new();
    let mut afternoon = Vec::new();
    let mut evening = Vec::new();
    for slot in &slots {
        let Some(time) = temporal::parse_hhmm(slot) else {
            continue;
        };
        let hour = time.hour();
        if hour < 12 {
            morning.push(slot.as_str());
        } else if hour < 17 {
            afternoon.push(slot.as_str());
        } else {
            evening.push(slot.as_str());
        }
    }

    let mut response = format!("Here's the availability on {date_str}:");
    for (label, bucket) in [
        ("Morning", morning),
        ("Afternoon", afternoon),
        ("Evening", evening),
    ] {
        if !bucket.is_empty() {
            response.push_str(&format!("\n{label}: {}", bucket.join(", ")));
        }
    }
    response.push_str("\nLet me know which time works, or ask about another day.");
    state.messages.push(response);
}

/// Try to book the extracted date and time. An unavailable time turns
/// into a nearest-slot suggestion that the next turn can accept.
pub async fn book_slot(state: &mut DialogueState, ctx: &TurnContext<'_>) {
    let Some(date_str) = state.date.clone() else {
        let prompt = if state.retry_count > ESCALATION_THRESHOLD {
            "I still don't have a date. Could you give me one like 'tomorrow' or 'July 15th'?"
        } else {
            "Please give me a date for the booking first."
        };
        state.messages.push(prompt.to_string());
        return;
    };

    let Some(time_str) = state.time.clone() else {
        let prompt = if state.retry_count > ESCALATION_THRESHOLD {
            "I still don't have a time. Could you give me one like '2pm' or '14:00'?"
        } else {
            "What time would you like to book?"
        };
        state.messages.push(prompt.to_string());
        return;
    };

    // State can arrive from the caller as round-tripped JSON, so both
    // fields are re-validated before anything hits the calendar.
    let Some(date) = temporal::parse_iso_date(&date_str) else {
        state.date = None;
        state.messages.push(
            "That date didn't look right, so I've cleared it. Could you give the day again?"
                .to_string(),
        );
        return;
    };
    let Some(requested) = temporal::parse_hhmm(&time_str) else {
        state.time = None;
        state
            .messages
            .push("That time doesn't look right. Please use HH:MM format.".to_string());
        return;
    };

    let slots = match ctx
        .calendar
        .list_available_slots(date, ctx.slot_duration_minutes)
        .await
    {
        Ok(slots) => slots,
        Err(e) => {
            tracing::error!(error = %e, date = %date_str, "availability lookup failed");
            state
                .messages
                .push(format!("I couldn't check availability before booking: {e:#}"));
            return;
        }
    };

    if slots.iter().any(|s| s == &time_str) {
        match ctx
            .calendar
            .create_booking(date, requested, ctx.booking_title, ctx.slot_duration_minutes)
            .await
        {
            Ok(confirmation) => {
                state.confirmed = true;
                // A stale offer must not outlive a successful booking.
                state.suggested_time = None;
                state.messages.push(format!(
                    "Booked! You're confirmed for {} at {}.",
                    confirmation.scheduled_date, confirmation.scheduled_time
                ));
            }
            Err(e) => {
                // Covers the race where the slot was taken between the
                // availability check and the booking call.
                tracing::error!(error = %e, date = %date_str, time = %time_str, "booking failed");
                state.messages.push(format!("Booking failed: {e:#}"));
            }
        }
        return;
    }

    match nearest_slot(&slots, requested) {
        Some(nearest) => {
            state.messages.push(format!(
                "Sorry, {time_str} isn't available on {date_str}. The closest open slot is {nearest}. Reply 'yes' to book that instead."
            ));
            state.suggested_time = Some(nearest);
        }
        None => {
            state.messages.push(format!(
                "There are no open slots on {date_str}. Would you like to try another day?"
            ));
        }
    }
}

/// Nearest slot by absolute time-of-day distance. Slots arrive in
/// ascending order, so keeping the first of a tied pair picks the
/// earlier time.
fn nearest_slot(slots: &[String], requested: NaiveTime) -> Option<String> {
    let mut best: Option<(i64, &String)> = None;
    for slot in slots {
        let Some(time) = temporal::parse_hhmm(slot) else {
            continue;
        };
        let distance = time.signed_duration_since(requested).num_minutes().abs();
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, slot));
        }
    }
    best.map(|(_, slot)| slot.clone())
}

pub fn handle_unknown(state: &mut DialogueState) {
    let message = if state.retry_count > ESCALATION_THRESHOLD {
        "I'm still having trouble understanding. Would you like to check availability or book an appointment?".to_string()
    } else {
        "I can help you check availability and book appointments. Try something like:\n\
         - 'Book a meeting tomorrow at 2pm'\n\
         - 'What's available next Tuesday?'\n\
         - 'Schedule a call for Friday afternoon'"
            .to_string()
    };
    state.messages.push(message);
}
