use super::ui;
use crate::core::Subscriber;
use crate::subscription::SubscriptionRegistry;
use anyhow::Result;

pub async fn run(registry: &SubscriptionRegistry, email: &str) -> Result<()> {
    match registry.subscribe(&Subscriber::new(email)).await {
        Ok(()) => {
            println!(
                "Subscribed {}",
                ui::style_text(email, ui::StyleType::Value)
            );
            Ok(())
        }
        Err(e) if e.is_conflict() => {
            eprintln!(
                "{} is already subscribed",
                ui::style_text(email, ui::StyleType::Warning)
            );
            Err(e.into())
        }
        Err(e) => {
            eprintln!(
                "Could not subscribe {}",
                ui::style_text(email, ui::StyleType::Error)
            );
            Err(e.into())
        }
    }
}

pub async fn list(registry: &SubscriptionRegistry) -> Result<()> {
    let subscribers = registry.subscriptions().await?;
    if subscribers.is_empty() {
        println!("{}", ui::style_text("No subscribers", ui::StyleType::Subtle));
        return Ok(());
    }

    println!("{}", ui::style_text("Subscribers", ui::StyleType::Title));
    for subscriber in subscribers {
        println!("{}", subscriber.email);
    }
    Ok(())
}
