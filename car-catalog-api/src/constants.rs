pub const API_NAME: &str = "[car-catalog-api]";

/// Calculations between two running-count log lines.
pub const CALCULATION_LOG_INTERVAL: u64 = 10;
