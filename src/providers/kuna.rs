use super::rest::{RateSource, RestProvider, first_row_item};
use crate::core::{Rate, RateError};

const PROVIDER_NAME: &str = "KunaRateProvider";
const MIN_ROW_ITEMS: usize = 9;
// Last trade price in the ticker row.
const RATE_INDEX: usize = 7;

pub struct KunaSource {
    url: String,
}

impl KunaSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

pub type KunaProvider = RestProvider<KunaSource>;

pub fn provider(url: &str, client: reqwest::Client) -> KunaProvider {
    RestProvider::new(KunaSource::new(url), client)
}

impl RateSource for KunaSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn extract_rate(&self, body: &[u8]) -> Result<Rate, RateError> {
        let item = first_row_item(body, MIN_ROW_ITEMS, RATE_INDEX)?;
        let value = item.as_f64().ok_or_else(|| {
            RateError::UnexpectedExchangeRateFormat(format!("expected a number, got {item}"))
        })?;
        Rate::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateProvider;
    use crate::providers::rest::http_client;
    use crate::providers::rest::test_utils::{create_rate_mock_server, rate_url};
    use std::time::Duration;

    const TICKER: &str =
        r#"[["btcuah",1050000,1.5,1051000,2.0,1200,0.1,1050500,34.2,1070000,1040000]]"#;

    fn source() -> KunaSource {
        KunaSource::new("http://unused")
    }

    #[test]
    fn test_extracts_last_price_from_ticker() {
        let rate = source().extract_rate(TICKER.as_bytes()).unwrap();
        assert_eq!(rate.value(), 1050500.0);
    }

    #[test]
    fn test_short_row_is_response_format_error() {
        let body = r#"[["btcuah",1,2,3,4,5,6,7]]"#;
        let err = source().extract_rate(body.as_bytes()).unwrap_err();
        assert!(matches!(err, RateError::UnexpectedResponseFormat(_)), "{err:?}");
    }

    #[test]
    fn test_string_rate_is_rate_format_error() {
        let body = r#"[["btcuah",1,2,3,4,5,6,"1050500",8]]"#;
        let err = source().extract_rate(body.as_bytes()).unwrap_err();
        assert!(
            matches!(err, RateError::UnexpectedExchangeRateFormat(_)),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = create_rate_mock_server("Server Error", 500).await;
        let provider = provider(
            &rate_url(&server),
            http_client(Duration::from_secs(5)).unwrap(),
        );

        let err = provider.exchange_rate().await.unwrap_err();
        assert!(matches!(err, RateError::UnexpectedStatusCode(500)), "{err:?}");
    }
}
