//! Plain-text rendering of the app state.

use std::fmt::Write;

use skygate_app::{ActiveForm, AppState};

pub fn render(state: &AppState) -> String {
    let mut out = String::new();

    let auth = if state.is_authenticated() {
        "logged in"
    } else {
        "logged out"
    };
    let _ = writeln!(out, "== Skygate ({}) ==", auth);

    if let Some(current) = &state.weather.current {
        let _ = writeln!(out, "{}", current.location_name);
        let _ = writeln!(out, "  {}", current.temperature);
        let _ = writeln!(out, "  {}", current.condition_description);
        let _ = writeln!(out, "  {}", current.observed_date);
    }

    if let Some(hint) = state.forecast_hint() {
        let _ = writeln!(out, "{}", hint.title());
        if let Some(detail) = hint.detail() {
            let _ = writeln!(out, "  {}", detail);
        }
    }

    let forecast = state.visible_forecast();
    if !forecast.is_empty() {
        let _ = writeln!(out, "Weather forecast:");
        for entry in forecast {
            let _ = writeln!(
                out,
                "  {:<12} {:>10}  {}",
                entry.date, entry.temperature.to_string(), entry.condition_description
            );
        }
    }

    match state.form {
        ActiveForm::None => {}
        ActiveForm::Signup => {
            let _ = writeln!(out, "[signup form open]");
        }
        ActiveForm::Login => {
            let _ = writeln!(out, "[login form open]");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skygate_auth::Session;
    use skygate_weather::{Celsius, CurrentWeather, ForecastEntry, LookupResult};

    fn porto() -> LookupResult {
        LookupResult {
            current: Some(CurrentWeather {
                location_name: "Porto".into(),
                temperature: Celsius::from_kelvin(300.15),
                condition_description: "clear sky".into(),
                observed_date: "11/14/2023".into(),
            }),
            forecast: vec![ForecastEntry {
                temperature: Celsius::from_kelvin(285.0),
                condition_description: "overcast clouds".into(),
                date: "11/15/2023".into(),
            }],
            error: None,
            empty_response: false,
        }
    }

    #[test]
    fn test_render_empty() {
        let text = render(&AppState::default());
        assert!(text.contains("logged out"));
        assert!(text.contains("Nothing to display!"));
    }

    #[test]
    fn test_render_logged_out_hides_forecast() {
        let mut state = AppState::default();
        state.apply_lookup(&porto());

        let text = render(&state);
        assert!(text.contains("27.00°C"));
        assert!(text.contains("Forecast available!"));
        assert!(!text.contains("overcast clouds"));
    }

    #[test]
    fn test_render_logged_in_shows_forecast() {
        let mut state = AppState::default();
        state.apply_lookup(&porto());
        state.apply_session(Session {
            token: Some("abc".into()),
            is_authenticated: true,
        });
        state.show_login();

        let text = render(&state);
        assert!(text.contains("Weather forecast:"));
        assert!(text.contains("11.85°C"));
        assert!(text.contains("[login form open]"));
    }
}
