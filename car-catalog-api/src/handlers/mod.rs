pub mod car;
pub mod docs;
pub mod health;
