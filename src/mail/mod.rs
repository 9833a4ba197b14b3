pub mod message;
pub mod smtp;

pub use message::{Message, MessageComposer, MessageTemplate, TemplateError};
pub use smtp::SmtpConnector;
