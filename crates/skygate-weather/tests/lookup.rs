//! Integration tests for WeatherController using wiremock.

use skygate_core::ApiClient;
use skygate_weather::{DateFormatter, WeatherController};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample(temp: f64, desc: &str, dt: i64) -> serde_json::Value {
    serde_json::json!({
        "main": {"temp": temp, "feels_like": temp},
        "weather": [{"id": 800, "main": "Clear", "description": desc}],
        "dt": dt
    })
}

fn payload(forecast_len: usize) -> serde_json::Value {
    let forecast: Vec<_> = (0..forecast_len)
        .map(|i| sample(290.15 + i as f64, "scattered clouds", 1_700_000_000 + 86_400 * i as i64))
        .collect();

    serde_json::json!({
        "current": {
            "name": "Lisbon",
            "main": {"temp": 300.15},
            "weather": [{"description": "clear sky"}],
            "dt": 1_700_000_000
        },
        "forecast": forecast
    })
}

fn controller(server: &MockServer) -> WeatherController {
    WeatherController::new(
        ApiClient::new(&server.uri(), None).unwrap(),
        DateFormatter::utc("%-m/%-d/%Y"),
    )
}

#[tokio::test]
async fn test_lookup_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .and(body_json(serde_json::json!({"city": "Lisbon"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(5)))
        .mount(&mock_server)
        .await;

    let result = controller(&mock_server).lookup("Lisbon").await;

    assert!(result.is_success());
    let current = result.current.unwrap();
    assert_eq!(current.location_name, "Lisbon");
    assert_eq!(current.temperature.to_string(), "27.00°C");
    assert_eq!(current.condition_description, "clear sky");
    assert_eq!(current.observed_date, "11/14/2023");

    assert_eq!(result.forecast.len(), 5);
    let temps: Vec<String> = result.forecast.iter().map(|f| f.temperature.to_string()).collect();
    assert_eq!(temps, ["17.00°C", "18.00°C", "19.00°C", "20.00°C", "21.00°C"]);
    assert_eq!(result.forecast[4].date, "11/18/2023");
}

#[tokio::test]
async fn test_lookup_server_error_gives_explanation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let result = controller(&mock_server).lookup("Nowhereville").await;

    assert!(result.current.is_none());
    assert!(result.forecast.is_empty());
    let error = result.error.unwrap();
    assert!(!error.is_empty());
    assert!(error.contains("valid city or country name"));
}

#[tokio::test]
async fn test_lookup_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let result = controller(&mock_server).lookup("Nowhereville").await;

    assert!(result.current.is_none());
    assert!(result.forecast.is_empty());
    assert!(result.empty_response);
    assert!(!result.error.unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_object_without_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let result = controller(&mock_server).lookup("Atlantis").await;

    assert!(result.current.is_none());
    assert!(result.error.unwrap().contains("current"));
}

#[tokio::test]
async fn test_lookup_wrong_types() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": {"name": "X", "main": {"temp": "hot"}, "weather": [], "dt": 0},
            "forecast": []
        })))
        .mount(&mock_server)
        .await;

    let result = controller(&mock_server).lookup("X").await;

    assert!(result.current.is_none());
    assert!(result.forecast.is_empty());
    assert!(result.error.is_some());
}
