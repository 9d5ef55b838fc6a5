//! Pure mapping of weather errors to HTTP status codes.

use super::WeatherError;

/// Maps a [`WeatherError`] to an HTTP status code.
///
/// - `InvalidCity` -> 400 (Bad Request)
/// - `Provider` -> 502 (Bad Gateway)
/// - `Transport` -> 504 (Gateway Timeout) on timeout, 502 otherwise
pub fn weather_error_to_status_code(error: &WeatherError) -> u16 {
    match error {
        WeatherError::InvalidCity => 400,
        WeatherError::Provider { .. } => 502,
        WeatherError::Transport(e) if e.timed_out => 504,
        WeatherError::Transport(_) => 502,
    }
}
