use serde::{Deserialize, Serialize};
use skygate_core::ApiError;

use crate::format::{Celsius, DateFormatter};

/// Current conditions for the looked-up location, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub temperature: Celsius,
    pub condition_description: String,
    pub observed_date: String,
}

/// One forecast sample, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub temperature: Celsius,
    pub condition_description: String,
    pub date: String,
}

/// Outcome of a lookup. A failed lookup carries no weather and an
/// explanation for the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupResult {
    pub current: Option<CurrentWeather>,
    pub forecast: Vec<ForecastEntry>,
    pub error: Option<String>,
    /// The backend answered with nothing at all; the view falls back to its
    /// placeholder instead of alerting.
    #[serde(skip)]
    pub empty_response: bool,
}

impl LookupResult {
    pub fn failed(explanation: impl Into<String>) -> Self {
        Self {
            current: None,
            forecast: Vec::new(),
            error: Some(explanation.into()),
            empty_response: false,
        }
    }

    pub fn nothing_to_display(explanation: impl Into<String>) -> Self {
        Self {
            empty_response: true,
            ..Self::failed(explanation)
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.current.is_some()
    }
}

/// Weather lookup errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl WeatherError {
    pub fn is_empty_response(&self) -> bool {
        matches!(self, WeatherError::Api(ApiError::EmptyResponse))
    }

    /// Explanation shown to the user when a lookup fails
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Api(ApiError::EmptyResponse) => "Nothing to display".to_string(),
            WeatherError::Api(e) => format!(
                "Please enter a valid city or country name ({})",
                e.user_message()
            ),
            WeatherError::MissingField(_) | WeatherError::InvalidTimestamp(_) => {
                format!("Please enter a valid city or country name ({})", self)
            }
        }
    }
}

// Raw payload returned by POST /get

#[derive(Debug, Clone, Deserialize)]
pub struct RawLookup {
    pub current: Option<RawCurrent>,
    pub forecast: Option<Vec<RawSample>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    pub name: String,
    pub main: RawMain,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub dt: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    pub main: RawMain,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub dt: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    /// Kelvin
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    pub description: String,
}

fn first_description(weather: &[RawCondition], field: &'static str) -> Result<String, WeatherError> {
    weather
        .first()
        .map(|w| w.description.clone())
        .ok_or(WeatherError::MissingField(field))
}

impl CurrentWeather {
    pub fn from_raw(raw: &RawCurrent, dates: &DateFormatter) -> Result<Self, WeatherError> {
        Ok(Self {
            location_name: raw.name.clone(),
            temperature: Celsius::from_kelvin(raw.main.temp),
            condition_description: first_description(&raw.weather, "current.weather[0]")?,
            observed_date: dates
                .format(raw.dt)
                .ok_or(WeatherError::InvalidTimestamp(raw.dt))?,
        })
    }
}

impl ForecastEntry {
    pub fn from_raw(raw: &RawSample, dates: &DateFormatter) -> Result<Self, WeatherError> {
        Ok(Self {
            temperature: Celsius::from_kelvin(raw.main.temp),
            condition_description: first_description(&raw.weather, "forecast[].weather[0]")?,
            date: dates
                .format(raw.dt)
                .ok_or(WeatherError::InvalidTimestamp(raw.dt))?,
        })
    }
}

impl RawLookup {
    /// Normalize both parts. Either part missing or malformed fails the
    /// whole lookup; forecast order is preserved.
    pub fn normalize(
        &self,
        dates: &DateFormatter,
    ) -> Result<(CurrentWeather, Vec<ForecastEntry>), WeatherError> {
        let current = self
            .current
            .as_ref()
            .ok_or(WeatherError::MissingField("current"))?;
        let forecast = self
            .forecast
            .as_ref()
            .ok_or(WeatherError::MissingField("forecast"))?;

        let current = CurrentWeather::from_raw(current, dates)?;
        let forecast = forecast
            .iter()
            .map(|sample| ForecastEntry::from_raw(sample, dates))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((current, forecast))
    }
}
