use super::ui;
use crate::App;
use crate::core::MailConnector;
use anyhow::Result;

pub async fn run<C: MailConnector>(app: &App<C>) -> Result<()> {
    let (rate, subscribers) = app.notify_subscribers().await?;

    if subscribers.is_empty() {
        println!(
            "{}",
            ui::style_text("No subscribers, nothing sent", ui::StyleType::Subtle)
        );
    } else {
        println!(
            "Sent rate {} to {} subscriber(s)",
            ui::style_text(&rate.to_string(), ui::StyleType::Value),
            subscribers.len()
        );
    }
    Ok(())
}
