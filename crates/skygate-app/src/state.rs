//! View state read by the rendering layer.
//!
//! One explicit value per concern: which form is open, the session, and the
//! weather currently on screen. Every handler replaces these wholesale from
//! the latest controller result.

use skygate_auth::Session;
use skygate_weather::{CurrentWeather, ForecastEntry, LookupResult};

/// Which auth form is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveForm {
    #[default]
    None,
    Signup,
    Login,
}

/// Weather currently displayed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherView {
    pub current: Option<CurrentWeather>,
    pub forecast: Vec<ForecastEntry>,
}

impl WeatherView {
    pub fn from_lookup(result: &LookupResult) -> Self {
        Self {
            current: result.current.clone(),
            forecast: result.forecast.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.forecast.is_empty()
    }
}

/// Placeholder shown in place of the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastHint {
    NothingToDisplay,
    LoginForForecast,
}

impl ForecastHint {
    pub fn title(self) -> &'static str {
        match self {
            ForecastHint::NothingToDisplay => "Nothing to display!",
            ForecastHint::LoginForForecast => "Forecast available!",
        }
    }

    pub fn detail(self) -> Option<&'static str> {
        match self {
            ForecastHint::NothingToDisplay => None,
            ForecastHint::LoginForForecast => Some(
                "To access the weather forecast for the next 5 days, please log in to your account.",
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Set once the initial session check has resolved
    pub ready: bool,
    pub form: ActiveForm,
    pub session: Session,
    pub weather: WeatherView,
    /// Last submitted location query
    pub city: String,
    notices: Vec<String>,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn show_signup(&mut self) {
        self.form = ActiveForm::Signup;
    }

    pub fn show_login(&mut self) {
        self.form = ActiveForm::Login;
    }

    pub fn close_form(&mut self) {
        self.form = ActiveForm::None;
    }

    pub fn apply_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Replace the weather view with a lookup result; failures clear it and
    /// queue the explanation. An empty response only shows the placeholder.
    pub fn apply_lookup(&mut self, result: &LookupResult) {
        self.weather = WeatherView::from_lookup(result);
        match &result.error {
            Some(_) if result.empty_response => {}
            Some(error) => self.push_notice(error.clone()),
            None => {}
        }
    }

    pub fn clear_weather(&mut self) {
        self.weather = WeatherView::default();
    }

    /// Forecast entries the UI may show. Empty unless authenticated,
    /// whatever was fetched.
    pub fn visible_forecast(&self) -> &[ForecastEntry] {
        if self.is_authenticated() {
            &self.weather.forecast
        } else {
            &[]
        }
    }

    pub fn forecast_hint(&self) -> Option<ForecastHint> {
        if self.weather.current.is_none() {
            Some(ForecastHint::NothingToDisplay)
        } else if !self.is_authenticated() {
            Some(ForecastHint::LoginForForecast)
        } else {
            None
        }
    }

    pub fn push_notice(&mut self, notice: impl Into<String>) {
        self.notices.push(notice.into());
    }

    /// Drain pending one-shot messages for the user
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}
