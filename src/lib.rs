//! Chat Chain Service
//!
//! An HTTP chat facade over a compiled processing chain:
//! - a system-prompt stage followed by a chat model call
//! - fail-fast chain compilation at startup
//! - graceful shutdown with a bounded drain window

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod service;

pub use config::AppConfig;
pub use service::{ChatService, ServiceState};
