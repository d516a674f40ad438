use std::fmt;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::{DomainError, Message};

/// Shape of the data a stage consumes or produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// An ordered message sequence, as consumed by a chat model
    Messages,
    /// A single generated reply
    Reply,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Messages => write!(f, "messages"),
            Self::Reply => write!(f, "reply"),
        }
    }
}

/// One unit of a chat chain.
///
/// Stages hold no per-request state; `apply` must build a new sequence
/// rather than touch its input.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Stage name, reported when the stage fails
    fn name(&self) -> &str;

    fn input_shape(&self) -> Shape {
        Shape::Messages
    }

    fn output_shape(&self) -> Shape {
        Shape::Messages
    }

    /// Whether the stage adds a system message to the sequence
    fn injects_system(&self) -> bool {
        false
    }

    async fn apply(&self, input: &[Message]) -> Result<Vec<Message>, DomainError>;
}
