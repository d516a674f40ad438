use std::collections::HashMap;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_SYSTEM_PROMPT: &str = "You are an intelligent assistant built with CloudWeGo Eino framework. \
You help developers understand and use the Eino framework for building LLM applications. \
Provide clear, technical explanations about the framework's capabilities and best practices.";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub model: ModelConfig,
    pub prompt: PromptConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Drain window granted to in-flight requests after a shutdown signal
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Chat model backing the chain, selected once at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Keyword-matched canned replies
    #[default]
    Mock,
    /// Any OpenAI-compatible chat completions endpoint
    OpenAi {
        model: String,
        #[serde(default = "default_openai_base_url")]
        base_url: String,
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        temperature: Option<f32>,
        #[serde(default = "default_model_timeout_secs")]
        timeout_secs: u64,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// System prompt template, may contain `${var:name}` placeholders
    pub system: String,
    pub variables: HashMap<String, String>,
}

/// Identity reported in chat responses and the health payload
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub framework: String,
    pub version: String,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 5,
        }
    }
}

impl ServerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            variables: HashMap::new(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "eino-chat-assistant".to_string(),
            framework: "cloudwego/eino".to_string(),
            version: "v0.5.2".to_string(),
        }
    }
}

impl AppConfig {
    /// Layer `config/default`, `config/local` and `APP__*` variables.
    ///
    /// Absent sources are skipped. A source that is present but does not
    /// deserialize is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false))
                .add_source(
                    Environment::with_prefix("APP")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
