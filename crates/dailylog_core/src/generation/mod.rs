//! Text-generation service contract.
//!
//! # Responsibility
//! - Define the stateless `complete(prompt) -> text` seam used by the pipeline.
//! - Define the failure taxonomy for remote generation calls.
//!
//! # Invariants
//! - Returned text has no guaranteed structure; callers must extract.
//! - A `ServiceError` is never fatal to the pipeline; call sites degrade.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod http;

pub use http::{HttpGenerationService, SYSTEM_PROMPT};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Request could not be sent or the connection failed/timed out.
    Transport(String),
    /// Endpoint answered with a non-success status.
    Status { status: u16, body: String },
    /// Success status, but the body does not carry generated text.
    MalformedResponse(String),
}

impl ServiceError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "generation_transport",
            Self::Status { .. } => "generation_status",
            Self::MalformedResponse(_) => "generation_malformed",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "generation request failed: {message}"),
            Self::Status { status, body } => {
                write!(f, "generation endpoint returned status {status}: {body}")
            }
            Self::MalformedResponse(message) => {
                write!(f, "generation response is malformed: {message}")
            }
        }
    }
}

impl Error for ServiceError {}

/// Stateless prompt-to-text function.
pub trait GenerationService {
    /// Sends one prompt and returns the generated text.
    fn complete(&self, prompt: &str) -> ServiceResult<String>;
}

impl<T: GenerationService + ?Sized> GenerationService for &T {
    fn complete(&self, prompt: &str) -> ServiceResult<String> {
        (**self).complete(prompt)
    }
}
