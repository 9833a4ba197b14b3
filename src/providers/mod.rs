pub mod binance;
pub mod coingecko;
pub mod kuna;
pub mod rest;

use crate::core::RateProvider;
use crate::core::config::{ProviderKind, ProvidersConfig};

pub use rest::{RateSource, RestProvider, http_client};

/// Builds providers in the configured fallback order, sharing one HTTP client.
pub fn from_config(
    config: &ProvidersConfig,
    client: reqwest::Client,
) -> Vec<Box<dyn RateProvider>> {
    config
        .order
        .iter()
        .map(|kind| -> Box<dyn RateProvider> {
            let url = config.url_for(*kind);
            match kind {
                ProviderKind::Binance => Box::new(binance::provider(url, client.clone())),
                ProviderKind::Coingecko => Box::new(coingecko::provider(url, client.clone())),
                ProviderKind::Kuna => Box::new(kuna::provider(url, client.clone())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_config_follows_order() {
        let config = ProvidersConfig {
            order: vec![ProviderKind::Kuna, ProviderKind::Binance],
            ..ProvidersConfig::default()
        };
        let client = http_client(Duration::from_secs(1)).unwrap();
        let names: Vec<String> = from_config(&config, client)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["KunaRateProvider", "BinanceRateProvider"]);
    }
}
