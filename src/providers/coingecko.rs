use super::rest::{RateSource, RestProvider};
use crate::core::{Rate, RateError};
use serde::Deserialize;

const PROVIDER_NAME: &str = "CoingeckoRateProvider";

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: BitcoinPrice,
}

#[derive(Debug, Deserialize)]
struct BitcoinPrice {
    uah: f64,
}

pub struct CoingeckoSource {
    url: String,
}

impl CoingeckoSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

pub type CoingeckoProvider = RestProvider<CoingeckoSource>;

pub fn provider(url: &str, client: reqwest::Client) -> CoingeckoProvider {
    RestProvider::new(CoingeckoSource::new(url), client)
}

impl RateSource for CoingeckoSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn extract_rate(&self, body: &[u8]) -> Result<Rate, RateError> {
        let response: SimplePriceResponse = serde_json::from_slice(body)
            .map_err(|e| RateError::UnexpectedResponseFormat(e.to_string()))?;
        Rate::new(response.bitcoin.uah)
    }
}
