//! System prompt templates
//!
//! Placeholders use the syntax `${var:name}` (required) or
//! `${var:name:default}` (optional, falls back to `default`).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9]*)(?::([^}]*))?\}")
        .expect("placeholder pattern is a valid regex")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },

    #[error("Template is empty")]
    Empty,
}

/// A placeholder found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub default: Option<String>,
}

impl Placeholder {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
    placeholders: Vec<Placeholder>,
}

impl PromptTemplate {
    /// Parse a template, collecting each distinct placeholder once in order of appearance
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();

        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut placeholders: Vec<Placeholder> = Vec::new();

        for cap in PLACEHOLDER_PATTERN.captures_iter(&source) {
            let name = cap[1].to_string();

            if placeholders.iter().any(|p| p.name == name) {
                continue;
            }

            placeholders.push(Placeholder {
                name,
                default: cap.get(2).map(|m| m.as_str().to_string()),
            });
        }

        Ok(Self {
            source,
            placeholders,
        })
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Substitute every placeholder, preferring supplied values over defaults
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .placeholders
            .iter()
            .find(|p| p.is_required() && !values.contains_key(&p.name))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.name.clone(),
            });
        }

        let rendered = PLACEHOLDER_PATTERN.replace_all(&self.source, |cap: &Captures| {
            values
                .get(&cap[1])
                .map(String::as_str)
                .or_else(|| cap.get(2).map(|m| m.as_str()))
                .unwrap_or_default()
                .to_string()
        });

        Ok(rendered.into_owned())
    }
}
