use crate::error::{AppError, AppResult};

use super::formatter::SearchResult;

/// Requested result ordering. Applied independently to each leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    ShortestDuration,
    EarliestDeparture,
    LatestDeparture,
    EarliestArrival,
    LatestArrival,
    LowestPrice,
}

impl SortMode {
    pub fn parse(token: &str) -> AppResult<Self> {
        match token {
            "shortest-duration" => Ok(SortMode::ShortestDuration),
            "earliest-departure" => Ok(SortMode::EarliestDeparture),
            "latest-departure" => Ok(SortMode::LatestDeparture),
            "earliest-arrival" => Ok(SortMode::EarliestArrival),
            "latest-arrival" => Ok(SortMode::LatestArrival),
            "lowest-price" => Ok(SortMode::LowestPrice),
            _ => Err(AppError::Validation(format!(
                "Unrecognized sort option '{}'",
                token
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::ShortestDuration => "shortest-duration",
            SortMode::EarliestDeparture => "earliest-departure",
            SortMode::LatestDeparture => "latest-departure",
            SortMode::EarliestArrival => "earliest-arrival",
            SortMode::LatestArrival => "latest-arrival",
            SortMode::LowestPrice => "lowest-price",
        }
    }
}

/// Orders results in memory on their raw keys. The sort is stable; equal
/// keys keep the order the repository returned them in.
pub fn sort_results(results: &mut [SearchResult], mode: SortMode) {
    match mode {
        SortMode::ShortestDuration => results.sort_by(|a, b| {
            a.duration_minutes
                .cmp(&b.duration_minutes)
                .then(a.departure.cmp(&b.departure))
        }),
        SortMode::EarliestDeparture => results.sort_by(|a, b| a.departure.cmp(&b.departure)),
        SortMode::LatestDeparture => results.sort_by(|a, b| b.departure.cmp(&a.departure)),
        SortMode::EarliestArrival => results.sort_by(|a, b| a.arrival.cmp(&b.arrival)),
        SortMode::LatestArrival => results.sort_by(|a, b| b.arrival.cmp(&a.arrival)),
        SortMode::LowestPrice => results.sort_by(|a, b| a.price.cmp(&b.price)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::duration::flight_duration;
    use crate::search::formatter::{
        AirportSummary, ClassInfo, FormattedFlight, PlaneSummary, TransitBlock,
    };
    use chrono::{DateTime, FixedOffset};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn summary(code: &str) -> AirportSummary {
        AirportSummary {
            id: Uuid::new_v4(),
            name: format!("{} International", code),
            code: code.to_string(),
            country: "Indonesia".to_string(),
            city: code.to_string(),
            continent: "Asia".to_string(),
            image: String::new(),
        }
    }

    fn result(code: &str, departure: &str, arrival: &str, price: i64) -> SearchResult {
        let departure = at(departure);
        let arrival = at(arrival);
        let duration = flight_duration(departure, arrival);

        SearchResult {
            formatted: FormattedFlight {
                id: Uuid::new_v4(),
                plane_id: Uuid::new_v4(),
                plane: PlaneSummary {
                    name: "Garuda Indonesia".to_string(),
                    code: "GA".to_string(),
                    image: String::new(),
                    terminal: None,
                },
                departure_date: String::new(),
                departure_time: String::new(),
                code: code.to_string(),
                departure_airport: summary("CGK"),
                transit: TransitBlock::None,
                arrival_date: String::new(),
                arrival_time: String::new(),
                destination_airport: summary("DPS"),
                capacity: 72,
                discount: None,
                price: Decimal::from(price),
                facilities: String::new(),
                duration: duration.text,
                class_info: ClassInfo::All(Vec::new()),
            },
            departure,
            arrival,
            price: Decimal::from(price),
            duration_minutes: duration.minutes,
        }
    }

    fn codes(results: &[SearchResult]) -> Vec<&str> {
        results
            .iter()
            .map(|result| result.formatted.code.as_str())
            .collect()
    }

    #[test]
    fn test_parse_round_trips_every_token() {
        for token in [
            "shortest-duration",
            "earliest-departure",
            "latest-departure",
            "earliest-arrival",
            "latest-arrival",
            "lowest-price",
        ] {
            assert_eq!(SortMode::parse(token).unwrap().as_str(), token);
        }

        assert!(SortMode::parse("fastest").is_err());
    }

    #[test]
    fn test_lowest_price_is_stable_on_ties() {
        let mut results = vec![
            result("A", "2024-06-12T08:00:00+07:00", "2024-06-12T10:00:00+07:00", 500),
            result("B", "2024-06-12T09:00:00+07:00", "2024-06-12T11:00:00+07:00", 300),
            result("C", "2024-06-12T10:00:00+07:00", "2024-06-12T12:00:00+07:00", 300),
            result("D", "2024-06-12T11:00:00+07:00", "2024-06-12T13:00:00+07:00", 100),
        ];

        sort_results(&mut results, SortMode::LowestPrice);

        assert_eq!(codes(&results), vec!["D", "B", "C", "A"]);
        assert!(results.windows(2).all(|pair| pair[0].price <= pair[1].price));
    }

    #[test]
    fn test_shortest_duration_breaks_ties_by_departure() {
        let mut results = vec![
            result("A", "2024-06-12T10:00:00+07:00", "2024-06-12T11:30:00+07:00", 100),
            result("B", "2024-06-12T08:00:00+07:00", "2024-06-12T09:30:00+07:00", 100),
            result("C", "2024-06-12T12:00:00+07:00", "2024-06-12T13:00:00+07:00", 100),
        ];

        sort_results(&mut results, SortMode::ShortestDuration);

        assert_eq!(codes(&results), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_departure_modes() {
        let mut results = vec![
            result("A", "2024-06-12T10:00:00+07:00", "2024-06-12T12:00:00+07:00", 100),
            result("B", "2024-06-12T08:00:00+07:00", "2024-06-12T13:00:00+07:00", 100),
        ];

        sort_results(&mut results, SortMode::EarliestDeparture);
        assert_eq!(codes(&results), vec!["B", "A"]);

        sort_results(&mut results, SortMode::LatestDeparture);
        assert_eq!(codes(&results), vec!["A", "B"]);
    }

    #[test]
    fn test_arrival_modes() {
        let mut results = vec![
            result("A", "2024-06-12T10:00:00+07:00", "2024-06-12T12:00:00+07:00", 100),
            result("B", "2024-06-12T08:00:00+07:00", "2024-06-12T13:00:00+07:00", 100),
        ];

        sort_results(&mut results, SortMode::EarliestArrival);
        assert_eq!(codes(&results), vec!["A", "B"]);

        sort_results(&mut results, SortMode::LatestArrival);
        assert_eq!(codes(&results), vec!["B", "A"]);
    }
}
