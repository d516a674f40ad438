//! Prompt templating - system prompts with variable support

mod stage;
mod template;

pub use stage::PromptStage;
pub use template::{Placeholder, PromptTemplate, TemplateError};
