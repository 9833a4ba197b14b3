use super::rest::{RateSource, RestProvider, first_row_item};
use crate::core::{Rate, RateError};

const PROVIDER_NAME: &str = "BinanceRateProvider";
const MIN_ROW_ITEMS: usize = 5;
// Kline close price, serialized as a decimal string.
const RATE_INDEX: usize = 4;

pub struct BinanceSource {
    url: String,
}

impl BinanceSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

pub type BinanceProvider = RestProvider<BinanceSource>;

pub fn provider(url: &str, client: reqwest::Client) -> BinanceProvider {
    RestProvider::new(BinanceSource::new(url), client)
}

impl RateSource for BinanceSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn extract_rate(&self, body: &[u8]) -> Result<Rate, RateError> {
        let item = first_row_item(body, MIN_ROW_ITEMS, RATE_INDEX)?;
        let text = item.as_str().ok_or_else(|| {
            RateError::UnexpectedExchangeRateFormat(format!("expected a string, got {item}"))
        })?;
        let value: f64 = text
            .parse()
            .map_err(|e| RateError::UnexpectedExchangeRateFormat(format!("'{text}': {e}")))?;
        Rate::new(value)
    }
}
