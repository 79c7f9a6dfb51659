pub mod airline;
pub mod airport;
pub mod flight;
pub mod flight_seat;
