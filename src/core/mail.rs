//! Mail transport abstractions
//!
//! A [`MailConnector`] produces one authenticated [`MailSession`] per call.
//! A session carries exactly one transaction: `mail`, then `rcpt` for every
//! recipient, then a single `data` write, then `quit`.

use async_trait::async_trait;
use thiserror::Error;

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("cannot connect to mail relay: {0}")]
    Connect(#[source] TransportError),

    #[error("mail relay rejected authentication: {0}")]
    Authenticate(#[source] TransportError),

    #[error("invalid mail address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: TransportError,
    },

    #[error("MAIL FROM rejected: {0}")]
    Mail(#[source] TransportError),

    #[error("RCPT TO <{recipient}> rejected: {source}")]
    Rcpt {
        recipient: String,
        #[source]
        source: TransportError,
    },

    #[error("DATA write failed: {0}")]
    Data(#[source] TransportError),

    #[error("QUIT failed: {0}")]
    Quit(#[source] TransportError),
}

#[async_trait]
pub trait MailSession: Send {
    async fn mail(&mut self, from: &str) -> Result<(), MailError>;

    async fn rcpt(&mut self, to: &str) -> Result<(), MailError>;

    /// Sends DATA followed by the full payload and its terminator.
    async fn data(&mut self, payload: &[u8]) -> Result<(), MailError>;

    async fn quit(&mut self) -> Result<(), MailError>;
}

#[async_trait]
pub trait MailConnector: Send + Sync {
    /// Opens a TLS session to the relay and authenticates it.
    async fn connect(&self) -> Result<Box<dyn MailSession>, MailError>;
}
