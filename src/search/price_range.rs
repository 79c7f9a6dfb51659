use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::utils::format::format_price;

/// Min/max seat price for one class, or an explicit marker that no seat of
/// that class matched the requested bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceRange {
    NoData,
    Span { min: Decimal, max: Decimal },
}

impl PriceRange {
    pub fn from_bounds(bounds: Option<(Decimal, Decimal)>) -> Self {
        match bounds {
            Some((min, max)) => PriceRange::Span { min, max },
            None => PriceRange::NoData,
        }
    }
}

impl Serialize for PriceRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PriceRange::NoData => serializer.serialize_str("no data"),
            PriceRange::Span { min, max } => {
                let mut state = serializer.serialize_struct("PriceRange", 2)?;
                state.serialize_field("minPrice", &format_price(*min))?;
                state.serialize_field("maxPrice", &format_price(*max))?;
                state.end()
            }
        }
    }
}

/// Per-class price spans reported alongside every search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRanges {
    #[serde(rename = "ECONOMY")]
    pub economy: PriceRange,
    #[serde(rename = "BUSINESS")]
    pub business: PriceRange,
    #[serde(rename = "FIRST")]
    pub first: PriceRange,
}
