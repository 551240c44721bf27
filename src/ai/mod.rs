//! AI assist gateway: prompt building, the hosted generation client, and the
//! background request lifecycle used by the dashboard views.

pub mod client;
pub mod dispatch;
pub mod gateway;
pub mod image;
pub mod prompts;

use thiserror::Error;

pub use client::{GeminiClient, GenerativeClient};
pub use dispatch::{AiCompletion, AiDispatcher, AiJob, AiOutcome, Control, RequestToken, RequestTracker};
pub use gateway::{Gateway, ReceiptScan};
pub use image::{ImageError, ReceiptImage};

/// Why a gateway call produced no generated content.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiError {
    #[error("No API key configured")]
    MissingCredential,
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("The model returned an empty response")]
    EmptyResponse,
    #[error("Could not decode response: {0}")]
    Decode(String),
}

pub type AiResult<T> = Result<T, AiError>;
