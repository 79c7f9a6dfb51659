use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::entities::flight_seat::SeatType;
use crate::error::{AppError, AppResult};

use super::paginate::PageWindow;
use super::sort::SortMode;

/// Raw query string as it arrives on the search endpoint. Everything is kept
/// as text; validation happens in one place, with one error shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchParams {
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub airline_name: Option<String>,
    pub adult: Option<String>,
    pub children: Option<String>,
    pub baby: Option<String>,
    pub seat_class: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub facilities: Option<String>,
    pub has_transit: Option<String>,
    pub has_discount: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated search criteria for one request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub airline_tokens: Vec<String>,
    pub seat_class: Option<SeatType>,
    pub has_transit: Option<bool>,
    pub has_discount: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub facility_tokens: Vec<String>,
    pub passengers: i32,
    pub sort: Option<SortMode>,
    pub window: PageWindow,
}

impl SearchQuery {
    /// Validates the raw parameters. Absent fields fall back to defaults;
    /// malformed values fail here, before any query is issued.
    pub fn from_raw(raw: RawSearchParams) -> AppResult<Self> {
        let window = PageWindow::from_raw(present(&raw.page), present(&raw.limit))?;

        let sort = match present(&raw.sort) {
            Some(token) => Some(SortMode::parse(token)?),
            None => None,
        };

        let seat_class = match present(&raw.seat_class) {
            Some(token) => Some(SeatType::parse(token).ok_or_else(|| {
                AppError::Validation("seatClass must be one of ECONOMY, BUSINESS, FIRST".to_string())
            })?),
            None => None,
        };

        let adult = parse_count(present(&raw.adult), 1, "adult")?;
        let children = parse_count(present(&raw.children), 0, "children")?;
        let baby = parse_count(present(&raw.baby), 0, "baby")?;

        // Summed in i64; the floored total must fit the capacity column.
        let total = adult as i64 + children as i64 + baby as i64;
        let passengers = i32::try_from(total.max(1))
            .map_err(|_| AppError::Validation("passenger total is out of range".to_string()))?;

        Ok(Self {
            departure_airport: present(&raw.departure_airport).map(str::to_string),
            arrival_airport: present(&raw.arrival_airport).map(str::to_string),
            departure_date: parse_date(present(&raw.departure_date), "departureDate")?,
            return_date: parse_date(present(&raw.return_date), "returnDate")?,
            airline_tokens: split_tokens(present(&raw.airline_name)),
            seat_class,
            has_transit: parse_flag(present(&raw.has_transit), "hasTransit")?,
            has_discount: parse_flag(present(&raw.has_discount), "hasDiscount")?,
            min_price: parse_price(present(&raw.min_price), "minPrice")?,
            max_price: parse_price(present(&raw.max_price), "maxPrice")?,
            facility_tokens: split_tokens(present(&raw.facilities)),
            passengers,
            sort,
            window,
        })
    }

    /// Bounds applied by the per-class price aggregation.
    pub fn price_bounds(&self) -> (Decimal, Decimal) {
        (
            self.min_price.unwrap_or(Decimal::ZERO),
            self.max_price.unwrap_or(Decimal::MAX),
        )
    }

    /// Wire token echoed back as `sortedBy` in the envelope.
    pub fn sorted_by(&self) -> &'static str {
        self.sort.map(|mode| mode.as_str()).unwrap_or("")
    }
}

/// Treats empty strings the same as missing parameters.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// Splits a multi-value parameter on the literal "%20" delimiter.
fn split_tokens(raw: Option<&str>) -> Vec<String> {
    let Some(text) = raw else {
        return Vec::new();
    };
    text.split("%20")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_date(raw: Option<&str>, field: &str) -> AppResult<Option<NaiveDate>> {
    let Some(text) = raw else {
        return Ok(None);
    };
    let date = text.trim().parse::<NaiveDate>().map_err(|_| {
        AppError::Validation(format!("{} must be a valid date (YYYY-MM-DD)", field))
    })?;
    // The day window is bounded by the following midnight, which must exist.
    if date.succ_opt().is_none() {
        return Err(AppError::Validation(format!("{} is out of range", field)));
    }
    Ok(Some(date))
}

fn parse_flag(raw: Option<&str>, field: &str) -> AppResult<Option<bool>> {
    match raw {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(AppError::Validation(format!(
            "{} must be 'true' or 'false'",
            field
        ))),
    }
}

fn parse_price(raw: Option<&str>, field: &str) -> AppResult<Option<Decimal>> {
    let Some(text) = raw else {
        return Ok(None);
    };
    text.trim()
        .parse::<Decimal>()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("{} must be a number", field)))
}

fn parse_count(raw: Option<&str>, default: i32, field: &str) -> AppResult<i32> {
    let Some(text) = raw else {
        return Ok(default);
    };
    text.trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation(format!("{} must be a number", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_params_absent() {
        let query = SearchQuery::from_raw(RawSearchParams::default()).unwrap();

        assert_eq!(query.passengers, 1);
        assert_eq!(query.window, PageWindow { page: 1, limit: 10 });
        assert_eq!(query.sort, None);
        assert_eq!(query.sorted_by(), "");
        assert!(query.airline_tokens.is_empty());
        assert!(query.facility_tokens.is_empty());
        assert_eq!(query.price_bounds(), (Decimal::ZERO, Decimal::MAX));
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let raw = RawSearchParams {
            departure_airport: Some(String::new()),
            sort: Some(String::new()),
            min_price: Some(String::new()),
            ..Default::default()
        };
        let query = SearchQuery::from_raw(raw).unwrap();

        assert_eq!(query.departure_airport, None);
        assert_eq!(query.sort, None);
        assert_eq!(query.min_price, None);
    }

    #[test]
    fn test_parses_full_query() {
        let raw = RawSearchParams {
            departure_airport: Some("CGK".to_string()),
            arrival_airport: Some("Denpasar".to_string()),
            departure_date: Some("2024-06-12".to_string()),
            return_date: Some("2024-06-15".to_string()),
            airline_name: Some("Garuda%20Lion Air".to_string()),
            adult: Some("2".to_string()),
            children: Some("1".to_string()),
            baby: Some("1".to_string()),
            seat_class: Some("economy".to_string()),
            min_price: Some("500000".to_string()),
            max_price: Some("1500000".to_string()),
            facilities: Some(" Wifi %20Meal".to_string()),
            has_transit: Some("true".to_string()),
            has_discount: Some("false".to_string()),
            sort: Some("lowest-price".to_string()),
            page: Some("2".to_string()),
            limit: Some("5".to_string()),
        };
        let query = SearchQuery::from_raw(raw).unwrap();

        assert_eq!(query.departure_airport.as_deref(), Some("CGK"));
        assert_eq!(
            query.departure_date,
            Some(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap())
        );
        assert_eq!(query.airline_tokens, vec!["Garuda", "Lion Air"]);
        assert_eq!(query.seat_class, Some(SeatType::Economy));
        assert_eq!(query.has_transit, Some(true));
        assert_eq!(query.has_discount, Some(false));
        assert_eq!(query.min_price, Some(Decimal::from(500_000)));
        assert_eq!(query.facility_tokens, vec!["Wifi", "Meal"]);
        assert_eq!(query.passengers, 4);
        assert_eq!(query.sort, Some(SortMode::LowestPrice));
        assert_eq!(query.sorted_by(), "lowest-price");
        assert_eq!(query.window, PageWindow { page: 2, limit: 5 });
    }

    #[test]
    fn test_passenger_total_floors_at_one() {
        let raw = RawSearchParams {
            adult: Some("0".to_string()),
            children: Some("0".to_string()),
            baby: Some("0".to_string()),
            ..Default::default()
        };
        let query = SearchQuery::from_raw(raw).unwrap();
        assert_eq!(query.passengers, 1);
    }

    #[test]
    fn test_rejects_passenger_total_overflow() {
        let raw = RawSearchParams {
            adult: Some("2147483647".to_string()),
            children: Some("1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SearchQuery::from_raw(raw),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_date_at_calendar_limit() {
        let raw = RawSearchParams {
            departure_date: Some("+262142-12-31".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SearchQuery::from_raw(raw),
            Err(AppError::Validation(_))
        ));

        let raw = RawSearchParams {
            departure_date: Some("+262142-12-30".to_string()),
            ..Default::default()
        };
        assert!(SearchQuery::from_raw(raw).is_ok());
    }

    #[test]
    fn test_rejects_malformed_values() {
        let cases = [
            RawSearchParams {
                min_price: Some("cheap".to_string()),
                ..Default::default()
            },
            RawSearchParams {
                adult: Some("two".to_string()),
                ..Default::default()
            },
            RawSearchParams {
                sort: Some("fastest".to_string()),
                ..Default::default()
            },
            RawSearchParams {
                has_transit: Some("yes".to_string()),
                ..Default::default()
            },
            RawSearchParams {
                seat_class: Some("premium".to_string()),
                ..Default::default()
            },
            RawSearchParams {
                departure_date: Some("12-06-2024".to_string()),
                ..Default::default()
            },
        ];

        for raw in cases {
            let result = SearchQuery::from_raw(raw.clone());
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "expected validation error for {:?}",
                raw
            );
        }
    }
}
