//! Message composition from a rate and configured templates.

use crate::core::Rate;
use crate::core::config::EmailConfig;
use thiserror::Error;

const PLACEHOLDER: &str = "value";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated placeholder at byte {0}")]
    Unterminated(usize),

    #[error("unknown placeholder '{0}', only {{{{value}}}} is supported")]
    UnknownPlaceholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Value,
}

/// A text with `{{value}}` slots. Nothing else is interpreted, and the
/// substituted text is never scanned again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = template;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after_open = &rest[start + 2..];
            let end = after_open
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + start))?;
            let name = after_open[..end].trim();
            if name != PLACEHOLDER {
                return Err(TemplateError::UnknownPlaceholder(name.to_string()));
            }
            segments.push(Segment::Value);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn render(&self, value: &str) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.as_str(),
                Segment::Value => value,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Message {
    /// RFC 822 shaped payload: From, To and Subject headers, a blank line, the body.
    pub fn payload(&self) -> Vec<u8> {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
            self.from,
            self.to.join(","),
            self.subject,
            self.body
        )
        .into_bytes()
    }
}

#[derive(Debug, Clone)]
pub struct MessageComposer {
    from: String,
    subject: MessageTemplate,
    body: MessageTemplate,
}

impl MessageComposer {
    pub fn new(config: &EmailConfig) -> Result<Self, TemplateError> {
        Ok(Self {
            from: config.from.clone(),
            subject: MessageTemplate::parse(&config.subject)?,
            body: MessageTemplate::parse(&config.body)?,
        })
    }

    pub fn compose(&self, rate: Rate, to: Vec<String>) -> Message {
        let value = rate.to_string();
        Message {
            from: self.from.clone(),
            to,
            subject: self.subject.render(&value),
            body: self.body.render(&value),
        }
    }
}
