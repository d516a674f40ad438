//! HTTP request/response types

pub mod chat;
pub mod error;
pub mod json;

pub use chat::{ChatRequest, ChatResponse};
pub use error::ApiError;
pub use json::{DecodeError, Json, JsonRejection};
