mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{TransportError, WeatherError};
pub use http_mapping::weather_error_to_status_code;
pub use traits::HttpFetcher;
pub use types::{weather_request, HttpResponse, ProviderSettings, WEATHER_CACHE_TTL};
