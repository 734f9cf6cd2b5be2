pub mod car_service;
pub mod seed;


pub use car_service::CarService;
