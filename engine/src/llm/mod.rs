//! Model Provider Abstraction Layer
//!
//! This module provides a common interface for the generative-model backends
//! Atelier can talk to (Ollama, OpenAI, Anthropic). The LLMProvider trait
//! defines the contract all backends implement, so the failover router can
//! work with any of them transparently. Providers return the raw completion
//! text; each caller (generators, selector, chat router) parses its own
//! payload out of it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod anthropic;
pub mod failover;
pub mod ollama;
pub mod openai;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during model operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message
    User,

    /// Assistant message
    Assistant,

    /// System message
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// Model provider trait that all backends must implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "ollama", "openai", "anthropic")
    fn name(&self) -> &str;

    /// Generate a completion for the given conversation
    ///
    /// # Arguments
    /// * `messages` - Conversation history including system prompt and user messages
    ///
    /// # Returns
    /// * `Ok(String)` - The raw completion text
    /// * `Err(LLMError)` - If the request fails
    async fn generate(&self, messages: &[Message]) -> Result<String>;

    /// Check if the provider is currently healthy and available.
    /// Default implementation returns true.
    async fn check_health(&self) -> bool {
        true
    }
}

/// Extract the first JSON object from model output.
///
/// Generators ask for bare JSON, but models routinely wrap it in markdown
/// fences or prose. Tries, in order:
/// 1. The entire trimmed content
/// 2. The body of the first markdown code fence
/// 3. A balanced `{...}` scan from the first opening brace
pub fn extract_json_object(content: &str) -> Option<&str> {
    let trimmed = content.trim();

    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed);
    }

    if let Some(inner) = extract_fenced_block(trimmed) {
        let inner = inner.trim();
        if inner.starts_with('{') {
            if let Some(obj) = extract_balanced(inner, '{', '}') {
                return Some(obj);
            }
        }
    }

    let start = trimmed.find('{')?;
    extract_balanced(&trimmed[start..], '{', '}')
}

/// Extract the first JSON array from model output.
///
/// Same fallback chain as [`extract_json_object`], scanning for `[...]`.
pub fn extract_json_array(content: &str) -> Option<&str> {
    let trimmed = content.trim();

    if trimmed.starts_with('[') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed);
    }

    if let Some(inner) = extract_fenced_block(trimmed) {
        let inner = inner.trim();
        if inner.starts_with('[') {
            if let Some(arr) = extract_balanced(inner, '[', ']') {
                return Some(arr);
            }
        }
    }

    let start = trimmed.find('[')?;
    extract_balanced(&trimmed[start..], '[', ']')
}

/// Extract the body of the first markdown code fence in the text.
///
/// Works even when there is trailing prose after the closing ```.
/// Returns `None` if no fenced block is found.
fn extract_fenced_block(content: &str) -> Option<&str> {
    // Find opening fence
    let fence_start = content.find("```")?;
    let after_opening = &content[fence_start + 3..];

    // Skip the language tag line (e.g. "json\n")
    let body_start_rel = after_opening.find('\n')? + 1;
    let body_start = fence_start + 3 + body_start_rel;

    // Find closing fence after the body starts
    let closing = content[body_start..].find("```")?;
    let body_end = body_start + closing;

    if body_start >= body_end {
        return None;
    }

    Some(&content[body_start..body_end])
}

/// Extract a balanced delimiter span starting at position 0 of `s`.
///
/// Counts open/close depth, respecting string literals, to find the
/// matching close delimiter.
fn extract_balanced(s: &str, open: char, close: char) -> Option<&str> {
    if !s.starts_with(open) {
        return None;
    }
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
