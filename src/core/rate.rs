//! Exchange rate abstractions and core types

use async_trait::async_trait;
use std::fmt::Display;
use thiserror::Error;

/// Quote currency per unit of base currency. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rate(f64);

impl Rate {
    pub fn new(value: f64) -> Result<Self, RateError> {
        if !value.is_finite() || value < 0.0 {
            return Err(RateError::UnexpectedExchangeRateFormat(format!(
                "rate must be a non-negative number, got {value}"
            )));
        }
        Ok(Rate(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("http request failure: {0}")]
    HttpRequestFailure(#[source] reqwest::Error),

    #[error("unexpected status code: {0}")]
    UnexpectedStatusCode(u16),

    #[error("unexpected response format: {0}")]
    UnexpectedResponseFormat(String),

    #[error("unexpected exchange rate format: {0}")]
    UnexpectedExchangeRateFormat(String),

    #[error("no rate providers configured")]
    NoProviders,
}

impl RateError {
    /// True for failures of the HTTP round trip itself, as opposed to payload problems.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RateError::HttpRequestFailure(_) | RateError::UnexpectedStatusCode(_)
        )
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn exchange_rate(&self) -> Result<Rate, RateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_rejects_negative_and_non_finite() {
        assert!(Rate::new(-1.0).is_err());
        assert!(Rate::new(f64::NAN).is_err());
        assert!(Rate::new(f64::INFINITY).is_err());
        assert_eq!(Rate::new(0.0).unwrap().value(), 0.0);
    }

    #[test]
    fn test_rate_displays_two_decimals() {
        assert_eq!(Rate::new(123.4).unwrap().to_string(), "123.40");
        assert_eq!(Rate::new(1_234_567.891).unwrap().to_string(), "1234567.89");
    }

    #[test]
    fn test_transport_classification() {
        assert!(RateError::UnexpectedStatusCode(503).is_transport());
        assert!(!RateError::UnexpectedResponseFormat("x".into()).is_transport());
        assert!(!RateError::UnexpectedExchangeRateFormat("x".into()).is_transport());
    }
}
