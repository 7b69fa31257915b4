use crate::models::Intent;

// Booking keywords are checked first: "book me whenever you're available"
// is a booking request, not an availability question.
const BOOKING_KEYWORDS: [&str; 5] = ["schedule", "book", "meeting", "appointment", "reserve"];
const AVAILABILITY_KEYWORDS: [&str; 4] = ["free time", "available", "open slots", "availability"];

/// Keyword classification of a single utterance. Pure and total: any
/// string maps to exactly one intent, unmatched input to `Unknown`.
pub fn classify(utterance: &str) -> Intent {
    let text = utterance.to_lowercase();

    if BOOKING_KEYWORDS.iter().any(|k| text.contains(k)) {
        Intent::BookAppointment
    } else if AVAILABILITY_KEYWORDS.iter().any(|k| text.contains(k)) {
        Intent::CheckAvailability
    } else {
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_keywords() {
        assert_eq!(classify("I'd like to book a slot"), Intent::BookAppointment);
        assert_eq!(classify("Schedule a call for Friday"), Intent::BookAppointment);
        assert_eq!(classify("can we set up a MEETING?"), Intent::BookAppointment);
        assert_eq!(classify("reserve an hour tomorrow"), Intent::BookAppointment);
    }

    #[test]
    fn test_availability_keywords() {
        assert_eq!(
            classify("do you have any free time on Monday"),
            Intent::CheckAvailability
        );
        assert_eq!(classify("what's your availability?"), Intent::CheckAvailability);
        assert_eq!(classify("any open slots next week"), Intent::CheckAvailability);
    }

    #[test]
    fn test_booking_wins_over_availability() {
        assert_eq!(
            classify("book me whenever you're available"),
            Intent::BookAppointment
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("hello"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
        assert_eq!(classify("what's the weather like"), Intent::Unknown);
    }

    #[test]
    fn test_idempotent() {
        let utterance = "Book a meeting for tomorrow morning";
        assert_eq!(classify(utterance), classify(utterance));
    }
}
