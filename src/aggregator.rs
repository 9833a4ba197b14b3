//! Ordered fallback over rate providers.

use crate::core::{Rate, RateError, RateProvider};
use tracing::{error, info};

pub struct RateAggregator {
    providers: Vec<Box<dyn RateProvider>>,
}

impl RateAggregator {
    /// Providers are consulted in the given order.
    pub fn new(providers: Vec<Box<dyn RateProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns the first provider's successful rate. Failures are logged and
    /// the next provider is tried; when every provider fails the last error
    /// is returned.
    pub async fn exchange_rate(&self) -> Result<Rate, RateError> {
        let mut last_error = RateError::NoProviders;

        for provider in &self.providers {
            match provider.exchange_rate().await {
                Ok(rate) => {
                    info!(provider = provider.name(), %rate, "Exchange rate fetched");
                    return Ok(rate);
                }
                Err(e) => {
                    error!(provider = provider.name(), error = %e, "Rate provider failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
