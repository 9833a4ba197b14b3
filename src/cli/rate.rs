use super::ui;
use crate::aggregator::RateAggregator;
use anyhow::{Context, Result};

pub async fn run(aggregator: &RateAggregator) -> Result<()> {
    let rate = aggregator
        .exchange_rate()
        .await
        .context("All rate providers failed")?;

    println!(
        "{} {}",
        ui::style_text("BTC/UAH:", ui::StyleType::Title),
        ui::style_text(&rate.to_string(), ui::StyleType::Value)
    );
    Ok(())
}
