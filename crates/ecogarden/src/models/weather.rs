use serde::Serialize;
use serde_json::Value;

/// Weather payload for one city, as returned by the provider.
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub city: String,
    pub source: &'static str,
    pub weather: Value,
}

impl WeatherResponse {
    pub fn new(city: impl Into<String>, weather: Value) -> Self {
        Self {
            city: city.into(),
            source: "openweathermap",
            weather,
        }
    }
}
