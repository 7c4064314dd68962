mod envelope;
mod kind;
mod message;
mod status;

pub use envelope::{ChatRequest, ChatResponse};
pub use kind::{Payload, PayloadKind};
pub use message::{ChatMessage, ASSISTANT, SYSTEM, USER};
pub use status::{ErrorBody, FeatureStatus, ModelInfo};
