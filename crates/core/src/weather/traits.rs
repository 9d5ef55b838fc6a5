use async_trait::async_trait;

use super::{HttpResponse, TransportError};

/// Minimal HTTP client used to reach the weather provider.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Issues a GET with the given query parameters.
    ///
    /// Any status is returned as a response; only network failures are errors.
    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<HttpResponse, TransportError>;
}
