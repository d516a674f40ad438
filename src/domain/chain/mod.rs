//! Chat chain domain - stage composition, compilation and invocation

mod compiled;
mod stage;

pub use compiled::{ChainBuilder, ChatChain};
pub use stage::{Shape, Stage};
