//! Configuration documents
//!
//! - [`ConfigDocument`]: the validated payload of one file
//! - [`ResolvedConfig`]: a document plus the coordinate that satisfied it
//!
//! Deserialization is strict: every struct denies unknown fields, so a typo
//! in a key is a hard failure rather than a silently ignored setting.

mod rules;
mod schema;

pub use rules::{
    ANTHROPIC_MIN_THINKING_BUDGET, GOOGLE_MIN_THINKING_BUDGET, validate_document,
};
pub use schema::{
    AnthropicOptions, CachingOptions, ConfigDocument, DocumentMetadata, GenerationParameters,
    GoogleOptions, OpenAiOptions, ProviderOptions, ReasoningEffort, ResolvedConfig,
    ThinkingOptions,
};
