//! Shared HTTP skeleton for rate providers.
//!
//! [`RestProvider`] owns the request and the status/transport error mapping;
//! each [`RateSource`] only knows its URL and how to read a rate out of a body.

use crate::core::{Rate, RateError, RateProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub trait RateSource: Send + Sync {
    fn name(&self) -> &str;

    fn url(&self) -> &str;

    fn extract_rate(&self, body: &[u8]) -> Result<Rate, RateError>;
}

/// Builds the client shared by every provider. `timeout` bounds the whole request.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent("ratemail/1.0")
        .timeout(timeout)
        .build()
}

pub struct RestProvider<S: RateSource> {
    source: S,
    client: Client,
}

impl<S: RateSource> RestProvider<S> {
    pub fn new(source: S, client: Client) -> Self {
        Self { source, client }
    }

    async fn request(&self) -> Result<Vec<u8>, RateError> {
        let url = self.source.url();
        debug!("Requesting exchange rate from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(RateError::HttpRequestFailure)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RateError::UnexpectedStatusCode(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(RateError::HttpRequestFailure)?;
        info!(
            provider = self.source.name(),
            bytes = body.len(),
            "Received rate response"
        );
        Ok(body.to_vec())
    }
}

#[async_trait]
impl<S: RateSource> RateProvider for RestProvider<S> {
    fn name(&self) -> &str {
        self.source.name()
    }

    #[instrument(name = "RateFetch", skip(self), fields(provider = %self.source.name()))]
    async fn exchange_rate(&self) -> Result<Rate, RateError> {
        let body = self.request().await?;
        let rate = self.source.extract_rate(&body)?;
        debug!("Extracted rate {}", rate);
        Ok(rate)
    }
}

/// Reads `rows[0][index]` out of an array-of-arrays payload, checking the
/// first row has at least `min_items` entries.
pub(crate) fn first_row_item(
    body: &[u8],
    min_items: usize,
    index: usize,
) -> Result<serde_json::Value, RateError> {
    let mut rows: Vec<Vec<serde_json::Value>> = serde_json::from_slice(body)
        .map_err(|e| RateError::UnexpectedResponseFormat(e.to_string()))?;

    let Some(row) = rows.first_mut() else {
        return Err(RateError::UnexpectedResponseFormat(
            "empty response array".to_string(),
        ));
    };
    if row.len() < min_items {
        return Err(RateError::UnexpectedResponseFormat(format!(
            "expected at least {min_items} items in first row, got {}",
            row.len()
        )));
    }
    row.get_mut(index)
        .map(serde_json::Value::take)
        .ok_or_else(|| {
            RateError::UnexpectedResponseFormat(format!("no item at index {index} in first row"))
        })
}

#[cfg(test)]
pub(crate) mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const RATE_PATH: &str = "/rate";

    pub async fn create_rate_mock_server(mock_response: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RATE_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub fn rate_url(server: &MockServer) -> String {
        format!("{}{}", server.uri(), RATE_PATH)
    }
}
