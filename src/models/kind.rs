use clap::ValueEnum;
use std::fmt;

use super::envelope::{ChatRequest, ChatResponse};
use super::message::ChatMessage;

/// Which of the three shapes a document is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PayloadKind {
    Message,
    Request,
    Response,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Message => write!(f, "chat message"),
            PayloadKind::Request => write!(f, "chat request"),
            PayloadKind::Response => write!(f, "chat response"),
        }
    }
}

/// A decoded document of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Message(ChatMessage),
    Request(ChatRequest),
    Response(ChatResponse),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Message(_) => PayloadKind::Message,
            Payload::Request(_) => PayloadKind::Request,
            Payload::Response(_) => PayloadKind::Response,
        }
    }
}
