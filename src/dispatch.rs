//! One notification send: compose, then a single SMTP transaction to every subscriber.

use crate::core::{MailConnector, MailError, MailSession, Rate, Subscriber};
use crate::mail::{Message, MessageComposer};
use tracing::{debug, info, warn};

pub struct NotificationDispatcher<C: MailConnector> {
    composer: MessageComposer,
    connector: C,
}

impl<C: MailConnector> NotificationDispatcher<C> {
    pub fn new(composer: MessageComposer, connector: C) -> Self {
        Self {
            composer,
            connector,
        }
    }

    /// Delivers one message addressed to all `subscribers`, in order. Any
    /// failure before the payload is accepted aborts the whole send.
    pub async fn send_exchange_rate(
        &self,
        rate: Rate,
        subscribers: &[Subscriber],
    ) -> Result<(), MailError> {
        if subscribers.is_empty() {
            debug!("No subscribers, nothing to send");
            return Ok(());
        }

        let recipients = subscribers.iter().map(|s| s.email.clone()).collect();
        let message = self.composer.compose(rate, recipients);

        let mut session = self.connector.connect().await?;
        if let Err(e) = transact(session.as_mut(), &message).await {
            // The relay may already have dropped us; the transaction error is what matters.
            let _ = session.quit().await;
            return Err(e);
        }
        if let Err(e) = session.quit().await {
            warn!(error = %e, "Message accepted but QUIT failed");
        }

        info!(recipients = message.to.len(), %rate, "Exchange rate sent");
        Ok(())
    }
}

async fn transact(session: &mut dyn MailSession, message: &Message) -> Result<(), MailError> {
    session.mail(&message.from).await?;
    for recipient in &message.to {
        session.rcpt(recipient).await?;
    }
    session.data(&message.payload()).await
}
