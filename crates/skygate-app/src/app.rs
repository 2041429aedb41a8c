use std::sync::Arc;

use anyhow::{Context, Result};
use skygate_auth::{
    AuthStatus, FileSessionStore, LoginForm, LoginResult, Session, SessionController,
    SessionStore, SignupForm, SignupResult,
};
use skygate_core::{ApiClient, Config};
use skygate_weather::{DateFormatter, LookupResult, WeatherController};

use crate::state::AppState;

/// Composes the session and weather controllers behind UI event handlers.
///
/// Handlers run to completion one at a time through `&mut self`; overlapping
/// requests from several front ends are not coordinated, and whichever
/// result lands last is what the state shows.
pub struct SkygateApp {
    session: SessionController,
    weather: WeatherController,
    state: AppState,
}

impl SkygateApp {
    pub fn new(session: SessionController, weather: WeatherController) -> Self {
        Self {
            session,
            weather,
            state: AppState::default(),
        }
    }

    /// Build controllers from configuration, persisting the session next to
    /// the config file
    pub fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_path()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let client = ApiClient::from_config(&config.api).context("Failed to create API client")?;
        let dates = DateFormatter::local(&config.display.date_format);

        tracing::info!("Using API at {}", client.base_url());

        Ok(Self::new(
            SessionController::new(client.clone(), store),
            WeatherController::new(client, dates),
        ))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Initial load: validate any stored session before the UI is ready
    pub async fn load(&mut self) -> AuthStatus {
        let status = self.refresh_auth().await;
        self.state.ready = true;
        status
    }

    /// Re-run the session check and mirror the result into the view state
    pub async fn refresh_auth(&mut self) -> AuthStatus {
        let status = self.session.check_auth().await;
        self.state.apply_session(self.session.session());
        status
    }

    pub fn show_signup(&mut self) {
        self.state.show_signup();
    }

    pub fn show_login(&mut self) {
        self.state.show_login();
    }

    pub fn close_form(&mut self) {
        self.state.close_form();
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.state.city = city.into();
    }

    /// Look up the current city and replace the weather view
    pub async fn submit_city(&mut self) -> LookupResult {
        let result = self.weather.lookup(&self.state.city).await;
        self.state.apply_lookup(&result);
        result
    }

    pub async fn submit_signup(&mut self, form: SignupForm) -> SignupResult {
        let result = self.session.signup(&form).await;
        self.state.push_notice(result.explanation());

        if result == SignupResult::Created {
            self.refresh_auth().await;
            self.state.close_form();
        }
        result
    }

    /// Log in; on success re-check the session, close the form and refetch
    /// the last city so the forecast becomes visible
    pub async fn submit_login(&mut self, form: LoginForm) -> LoginResult {
        let result = self.session.login(&form).await;
        self.state.push_notice(result.explanation());

        if result.is_success() {
            self.refresh_auth().await;
            self.state.close_form();

            if !self.state.city.trim().is_empty() {
                self.submit_city().await;
            }
        }
        result
    }

    /// Always ends logged out with an empty weather view
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.state.apply_session(Session::default());
        self.state.clear_weather();
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        self.state.take_notices()
    }
}
