pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod thread;
pub mod ui;

pub use codec::Codec;
pub use config::Config;
pub use error::{ChatwireError, Result, Violation};
pub use models::{ChatMessage, ChatRequest, ChatResponse, Payload, PayloadKind};
