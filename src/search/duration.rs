use chrono::{DateTime, FixedOffset};

/// Elapsed travel time, as shown to clients and as a comparable sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightDuration {
    pub text: String,
    pub minutes: i64,
}

/// End-to-end duration from departure to final arrival. A transit stop does
/// not split the duration; it is part of the same interval.
pub fn flight_duration(
    departure: DateTime<FixedOffset>,
    arrival: DateTime<FixedOffset>,
) -> FlightDuration {
    let minutes = (arrival - departure).num_minutes();
    FlightDuration {
        text: format!("{}h {}m", minutes / 60, minutes % 60),
        minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_duration_hours_and_minutes() {
        let duration = flight_duration(at("2024-01-01T08:00:00+07:00"), at("2024-01-01T11:30:00+07:00"));
        assert_eq!(duration.text, "3h 30m");
        assert_eq!(duration.minutes, 210);
    }

    #[test]
    fn test_duration_exact_hours() {
        let duration = flight_duration(at("2024-01-01T08:00:00+07:00"), at("2024-01-01T10:00:00+07:00"));
        assert_eq!(duration.text, "2h 0m");
        assert_eq!(duration.minutes, 120);
    }

    #[test]
    fn test_duration_under_an_hour() {
        let duration = flight_duration(at("2024-01-01T08:00:00+07:00"), at("2024-01-01T08:45:00+07:00"));
        assert_eq!(duration.text, "0h 45m");
        assert_eq!(duration.minutes, 45);
    }

    #[test]
    fn test_duration_spans_timezone_offsets() {
        // Same instants expressed in different offsets.
        let duration = flight_duration(at("2024-01-01T01:00:00+00:00"), at("2024-01-01T11:30:00+07:00"));
        assert_eq!(duration.text, "3h 30m");
        assert_eq!(duration.minutes, 210);
    }
}
