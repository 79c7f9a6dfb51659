use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "seat_type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    #[sea_orm(string_value = "ECONOMY")]
    Economy,
    #[sea_orm(string_value = "BUSINESS")]
    Business,
    #[sea_orm(string_value = "FIRST")]
    First,
}

impl SeatType {
    /// Accepts the wire token in any casing ("economy" and "ECONOMY" both match).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_uppercase().as_str() {
            "ECONOMY" => Some(SeatType::Economy),
            "BUSINESS" => Some(SeatType::Business),
            "FIRST" => Some(SeatType::First),
            _ => None,
        }
    }
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "seat_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "BOOKED")]
    Booked,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flight_seat")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub flight_id: Uuid,
    #[sea_orm(column_name = "type")]
    pub seat_type: SeatType,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub status: SeatStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::flight::Entity",
        from = "Column::FlightId",
        to = "super::flight::Column::Id"
    )]
    Flight,
}

impl Related<super::flight::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flight.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_type_parse_is_case_insensitive() {
        assert_eq!(SeatType::parse("economy"), Some(SeatType::Economy));
        assert_eq!(SeatType::parse("ECONOMY"), Some(SeatType::Economy));
        assert_eq!(SeatType::parse("Business"), Some(SeatType::Business));
        assert_eq!(SeatType::parse("first"), Some(SeatType::First));
        assert_eq!(SeatType::parse("premium"), None);
    }
}
