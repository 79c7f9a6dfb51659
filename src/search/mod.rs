pub mod duration;
pub mod filter;
pub mod formatter;
pub mod paginate;
pub mod price_range;
pub mod query;
pub mod sort;
