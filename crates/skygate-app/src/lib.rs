//! Skygate application layer
//!
//! Ties the session and weather controllers to explicit view state that a
//! front end renders from.

pub mod app;
pub mod state;

pub use app::SkygateApp;
pub use state::{ActiveForm, AppState, ForecastHint, WeatherView};
