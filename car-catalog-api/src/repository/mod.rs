pub mod car_repo;
pub mod travel_log_repo;

pub use car_repo::CarRepository;
pub use travel_log_repo::TravelLogRepository;
