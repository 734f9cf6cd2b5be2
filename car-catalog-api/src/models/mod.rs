pub mod car;
pub mod travel_time;

pub use car::{Car, CarInput};
pub use travel_time::{TravelTime, TravelTimeInput, TravelTimeResult};
