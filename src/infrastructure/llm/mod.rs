//! Chat model implementations

mod factory;
mod http_client;
mod keyword;
mod openai;

pub use factory::ChatModelFactory;
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use keyword::KeywordChatModel;
pub use openai::OpenAiChatModel;
