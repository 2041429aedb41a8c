//! Current weather + forecast lookup by free-text location.

use serde::Serialize;
use skygate_core::ApiClient;
use tracing::instrument;

use crate::format::DateFormatter;
use crate::types::{LookupResult, RawLookup, WeatherError};

const LOOKUP_PATH: &str = "/get";

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    city: &'a str,
}

#[derive(Debug, Clone)]
pub struct WeatherController {
    client: ApiClient,
    dates: DateFormatter,
}

impl WeatherController {
    pub fn new(client: ApiClient, dates: DateFormatter) -> Self {
        Self { client, dates }
    }

    /// Look up current weather and forecast for `query`.
    ///
    /// No authentication is sent; the forecast is always fetched and it is
    /// up to the caller to hide it from logged-out users. Every failure comes
    /// back as an empty result with an explanation.
    #[instrument(skip(self), level = "info")]
    pub async fn lookup(&self, query: &str) -> LookupResult {
        match self.fetch(query).await {
            Ok(result) => {
                tracing::info!(
                    "Lookup succeeded with {} forecast entries",
                    result.forecast.len()
                );
                result
            }
            Err(e) if e.is_empty_response() => {
                tracing::info!("Lookup returned an empty body");
                LookupResult::nothing_to_display(e.user_message())
            }
            Err(e) => {
                tracing::error!("Error fetching weather data: {}", e);
                LookupResult::failed(e.user_message())
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<LookupResult, WeatherError> {
        let raw: RawLookup = self
            .client
            .post_json_optional(LOOKUP_PATH, &LookupRequest { city: query }, None)
            .await?
            .ok_or(WeatherError::Api(skygate_core::ApiError::EmptyResponse))?;

        let (current, forecast) = raw.normalize(&self.dates)?;

        Ok(LookupResult {
            current: Some(current),
            forecast,
            error: None,
            empty_response: false,
        })
    }
}
