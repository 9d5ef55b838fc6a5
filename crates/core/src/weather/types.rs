use std::time::Duration;

use serde_json::Value;

/// Lifetime of a cached weather payload.
pub const WEATHER_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Status and decoded body of an HTTP response.
///
/// A body that is not JSON is kept as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// The body as text, for error reporting.
    pub fn body_text(&self) -> String {
        match &self.body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Connection settings for the OpenWeatherMap-compatible provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    /// Language of the textual descriptions (`lang` parameter).
    pub lang: String,
    /// Unit system (`units` parameter), e.g. `metric`.
    pub units: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: String::new(),
            lang: "fr".to_string(),
            units: "metric".to_string(),
        }
    }
}

/// Builds the URL and query parameters of a current-weather request.
pub fn weather_request(settings: &ProviderSettings, city: &str) -> (String, Vec<(String, String)>) {
    let url = format!("{}/weather", settings.base_url.trim_end_matches('/'));
    let query = vec![
        ("q".to_string(), city.to_string()),
        ("appid".to_string(), settings.api_key.clone()),
        ("lang".to_string(), settings.lang.clone()),
        ("units".to_string(), settings.units.clone()),
    ];
    (url, query)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_weather_request_strips_trailing_slash() {
        let settings = ProviderSettings {
            base_url: "http://localhost:9000/data/2.5/".to_string(),
            api_key: "k".to_string(),
            ..ProviderSettings::default()
        };

        let (url, query) = weather_request(&settings, "Lyon");

        assert_eq!(url, "http://localhost:9000/data/2.5/weather");
        assert_eq!(
            query,
            vec![
                ("q".to_string(), "Lyon".to_string()),
                ("appid".to_string(), "k".to_string()),
                ("lang".to_string(), "fr".to_string()),
                ("units".to_string(), "metric".to_string()),
            ]
        );
    }

    #[test]
    fn test_only_200_is_success() {
        assert!(HttpResponse::new(200, json!({})).is_success());
        assert!(!HttpResponse::new(201, json!({})).is_success());
        assert!(!HttpResponse::new(500, json!({})).is_success());
    }

    #[test]
    fn test_body_text_unwraps_strings() {
        assert_eq!(
            HttpResponse::new(502, json!("Bad Gateway")).body_text(),
            "Bad Gateway"
        );
        assert_eq!(
            HttpResponse::new(404, json!({"cod": "404"})).body_text(),
            "{\"cod\":\"404\"}"
        );
    }
}
