//! Weather lookup for Skygate
//!
//! Fetches current conditions and a multi-day forecast for a named location
//! and normalizes the raw payload into display-ready records.

pub mod controller;
pub mod format;
pub mod types;

pub use controller::WeatherController;
pub use format::{Celsius, DateFormatter, DEFAULT_DATE_FORMAT};
pub use types::*;
