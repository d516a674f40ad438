use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Chain compilation error: {message}")]
    Compilation { message: String },

    #[error("Model unavailable: {model} - {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("Not supported: {model} does not implement {operation}")]
    NotSupported { model: String, operation: String },

    #[error("Chain execution failed at '{stage}': {source}")]
    ChainExecution {
        stage: String,
        source: Box<DomainError>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn compilation(message: impl Into<String>) -> Self {
        Self::Compilation {
            message: message.into(),
        }
    }

    pub fn model_unavailable(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn not_supported(model: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::NotSupported {
            model: model.into(),
            operation: operation.into(),
        }
    }

    /// Wrap the first failure of a chain run, naming the stage that produced it
    pub fn chain_execution(stage: impl Into<String>, source: DomainError) -> Self {
        Self::ChainExecution {
            stage: stage.into(),
            source: Box::new(source),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
