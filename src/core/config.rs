use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const BINANCE_URL: &str =
    "https://api.binance.com/api/v3/klines?symbol=BTCUAH&interval=1s&limit=1";
pub const COINGECKO_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=uah";
pub const KUNA_URL: &str = "https://api.kuna.io/v3/tickers?symbols=btcuah";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Binance,
    Coingecko,
    Kuna,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub binance: Option<ProviderConfig>,
    pub coingecko: Option<ProviderConfig>,
    pub kuna: Option<ProviderConfig>,
    #[serde(default = "default_provider_order")]
    pub order: Vec<ProviderKind>,
}

fn default_provider_order() -> Vec<ProviderKind> {
    vec![
        ProviderKind::Binance,
        ProviderKind::Coingecko,
        ProviderKind::Kuna,
    ]
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            binance: None,
            coingecko: None,
            kuna: None,
            order: default_provider_order(),
        }
    }
}

impl ProvidersConfig {
    /// Endpoint for a provider, falling back to the public API URL.
    pub fn url_for(&self, kind: ProviderKind) -> &str {
        let (configured, default) = match kind {
            ProviderKind::Binance => (&self.binance, BINANCE_URL),
            ProviderKind::Coingecko => (&self.coingecko, COINGECKO_URL),
            ProviderKind::Kuna => (&self.kuna, KUNA_URL),
        };
        configured.as_ref().map_or(default, |p| &p.url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
}

fn default_smtp_port() -> u16 {
    465
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EmailConfig {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_body")]
    pub body: String,
}

fn default_from() -> String {
    "no.reply@currency.info.api".to_string()
}

fn default_subject() -> String {
    "BTC to UAH exchange rate".to_string()
}

fn default_body() -> String {
    "The BTC to UAH exchange rate is {{value}} UAH per BTC".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            from: default_from(),
            subject: default_subject(),
            body: default_body(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("info", "currency", "ratemail")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("info", "currency", "ratemail")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
