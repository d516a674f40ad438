//! Infrastructure layer - chat model backends and process-level plumbing

pub mod llm;
pub mod logging;
