use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flight")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub plane_id: Uuid,
    pub departure_airport_id: Uuid,
    pub destination_airport_id: Uuid,
    pub transit_airport_id: Option<Uuid>,
    pub departure_date: DateTimeWithTimeZone,
    pub arrival_date: DateTimeWithTimeZone,
    pub transit_arrival_date: Option<DateTimeWithTimeZone>,
    pub transit_departure_date: Option<DateTimeWithTimeZone>,
    pub capacity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub discount: Option<i32>,
    pub facilities: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::airline::Entity",
        from = "Column::PlaneId",
        to = "super::airline::Column::Id"
    )]
    Plane,
    #[sea_orm(
        belongs_to = "super::airport::Entity",
        from = "Column::DepartureAirportId",
        to = "super::airport::Column::Id"
    )]
    DepartureAirport,
    #[sea_orm(
        belongs_to = "super::airport::Entity",
        from = "Column::DestinationAirportId",
        to = "super::airport::Column::Id"
    )]
    DestinationAirport,
    #[sea_orm(
        belongs_to = "super::airport::Entity",
        from = "Column::TransitAirportId",
        to = "super::airport::Column::Id"
    )]
    TransitAirport,
    #[sea_orm(has_many = "super::flight_seat::Entity")]
    Seats,
}

impl Related<super::airline::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plane.def()
    }
}

impl Related<super::flight_seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Base price with the percentage discount applied, when one is set.
    pub fn effective_price(&self) -> Decimal {
        match self.discount {
            Some(discount) if discount > 0 => {
                self.price - self.price * Decimal::from(discount) / Decimal::from(100)
            }
            _ => self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn base_flight(price: Decimal, discount: Option<i32>) -> Model {
        let departure: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2024-06-12T08:00:00+07:00").unwrap();
        Model {
            id: Uuid::new_v4(),
            code: "GA-CGK-1".to_string(),
            plane_id: Uuid::new_v4(),
            departure_airport_id: Uuid::new_v4(),
            destination_airport_id: Uuid::new_v4(),
            transit_airport_id: None,
            departure_date: departure,
            arrival_date: departure + chrono::Duration::hours(2),
            transit_arrival_date: None,
            transit_departure_date: None,
            capacity: 72,
            price,
            discount,
            facilities: "Wifi".to_string(),
            created_at: departure,
        }
    }

    #[test]
    fn test_effective_price_applies_discount() {
        let flight = base_flight(Decimal::from(1_500_000), Some(10));
        assert_eq!(flight.effective_price(), Decimal::from(1_350_000));
    }

    #[test]
    fn test_effective_price_without_discount() {
        let flight = base_flight(Decimal::from(1_500_000), None);
        assert_eq!(flight.effective_price(), Decimal::from(1_500_000));

        let zero = base_flight(Decimal::from(1_500_000), Some(0));
        assert_eq!(zero.effective_price(), Decimal::from(1_500_000));
    }
}
