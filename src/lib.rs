pub mod aggregator;
pub mod cli;
pub mod core;
pub mod dispatch;
pub mod mail;
pub mod providers;
pub mod store;
pub mod subscription;

use crate::aggregator::RateAggregator;
use crate::core::config::AppConfig;
use crate::core::{MailConnector, Rate, Subscriber};
use crate::dispatch::NotificationDispatcher;
use crate::mail::{MessageComposer, SmtpConnector};
use crate::store::{DiskStorage, SubscriberStore};
use crate::subscription::SubscriptionRegistry;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Partition holding subscriber records under the data path.
pub const SUBSCRIBERS_PARTITION: &str = "subscribers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Rate,
    Subscribe(String),
    Subscribers,
    Send,
}

/// The three request-triggered operations, wired together.
pub struct App<C: MailConnector = SmtpConnector> {
    pub aggregator: RateAggregator,
    pub registry: SubscriptionRegistry,
    pub dispatcher: NotificationDispatcher<C>,
}

impl App<SmtpConnector> {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let dispatcher = dispatcher_from_config(config)?;
        Ok(App::new(
            aggregator_from_config(config)?,
            registry_from_config(config)?,
            dispatcher,
        ))
    }
}

pub fn aggregator_from_config(config: &AppConfig) -> Result<RateAggregator> {
    let client =
        providers::http_client(config.http.timeout()).context("Failed to build HTTP client")?;
    let aggregator = RateAggregator::new(providers::from_config(&config.providers, client));
    debug!("Rate providers: {:?}", aggregator.provider_names());
    Ok(aggregator)
}

pub fn registry_from_config(config: &AppConfig) -> Result<SubscriptionRegistry> {
    let data_path = config.default_data_path()?;
    let storage = DiskStorage::open(&data_path, SUBSCRIBERS_PARTITION)
        .with_context(|| format!("Failed to open subscriber store at {}", data_path.display()))?;
    let store = SubscriberStore::new(Arc::new(storage));
    Ok(SubscriptionRegistry::new(store))
}

pub fn dispatcher_from_config(
    config: &AppConfig,
) -> Result<NotificationDispatcher<SmtpConnector>> {
    let smtp = config
        .smtp
        .clone()
        .context("Missing smtp section in config, required for sending")?;
    let composer =
        MessageComposer::new(&config.email).context("Invalid email subject or body template")?;
    let connector = SmtpConnector::new(smtp, config.http.timeout());
    Ok(NotificationDispatcher::new(composer, connector))
}

impl<C: MailConnector> App<C> {
    pub fn new(
        aggregator: RateAggregator,
        registry: SubscriptionRegistry,
        dispatcher: NotificationDispatcher<C>,
    ) -> Self {
        Self {
            aggregator,
            registry,
            dispatcher,
        }
    }

    /// Fetches the current rate and mails it to every subscriber.
    pub async fn notify_subscribers(&self) -> Result<(Rate, Vec<Subscriber>)> {
        let rate = self
            .aggregator
            .exchange_rate()
            .await
            .context("Failed to fetch exchange rate")?;
        let subscribers = self.registry.subscriptions().await?;
        self.dispatcher
            .send_exchange_rate(rate, &subscribers)
            .await
            .context("Failed to send exchange rate")?;
        Ok((rate, subscribers))
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratemail starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {:#?}", config.providers);

    match command {
        AppCommand::Rate => cli::rate::run(&aggregator_from_config(&config)?).await,
        AppCommand::Subscribe(email) => {
            cli::subscribe::run(&registry_from_config(&config)?, &email).await
        }
        AppCommand::Subscribers => cli::subscribe::list(&registry_from_config(&config)?).await,
        AppCommand::Send => cli::send::run(&App::from_config(&config)?).await,
    }
}
