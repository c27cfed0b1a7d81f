//! Cross-field rules applied after strict deserialization

use super::schema::ConfigDocument;
use crate::error::{CascadeError, CascadeResult};

/// Minimum Anthropic extended-thinking budget
pub const ANTHROPIC_MIN_THINKING_BUDGET: u32 = 1024;

/// Minimum non-zero Google thinking budget
pub const GOOGLE_MIN_THINKING_BUDGET: u32 = 128;

/// Validate value ranges and cross-field constraints of a document.
///
/// Returns the first violation as an invalid configuration error.
pub fn validate_document(doc: &ConfigDocument) -> CascadeResult<()> {
    if doc.provider.trim().is_empty() {
        return Err(CascadeError::invalid_configuration(
            "provider must not be empty",
        ));
    }
    if doc.model.trim().is_empty() {
        return Err(CascadeError::invalid_configuration("model must not be empty"));
    }

    if let Some(params) = &doc.parameters {
        if let Some(temp) = params.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(CascadeError::invalid_configuration(format!(
                    "temperature must be between 0.0 and 2.0, got {}",
                    temp
                )));
            }
        }
        if let Some(top_p) = params.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(CascadeError::invalid_configuration(format!(
                    "top_p must be between 0.0 and 1.0, got {}",
                    top_p
                )));
            }
        }
        if params.max_tokens == Some(0) {
            return Err(CascadeError::invalid_configuration(
                "max_tokens must be greater than 0",
            ));
        }
        if params.top_k == Some(0) {
            return Err(CascadeError::invalid_configuration(
                "top_k must be greater than 0",
            ));
        }
    }

    if let Some(options) = &doc.provider_options {
        if let Some(thinking) = options.anthropic.as_ref().and_then(|a| a.thinking.as_ref()) {
            if thinking.enabled && thinking.budget_tokens < ANTHROPIC_MIN_THINKING_BUDGET {
                return Err(CascadeError::invalid_configuration(format!(
                    "anthropic thinking budget_tokens must be at least {}, got {}",
                    ANTHROPIC_MIN_THINKING_BUDGET, thinking.budget_tokens
                )));
            }
        }
        if let Some(budget) = options.google.as_ref().and_then(|g| g.thinking_budget) {
            if budget != 0 && budget < GOOGLE_MIN_THINKING_BUDGET {
                return Err(CascadeError::invalid_configuration(format!(
                    "google thinking_budget must be 0 or at least {}, got {}",
                    GOOGLE_MIN_THINKING_BUDGET, budget
                )));
            }
        }
    }

    if doc.caching.is_some() && doc.cache_ttl_secs.is_some() {
        return Err(CascadeError::invalid_configuration(
            "cache_ttl_secs and caching are mutually exclusive; use caching.ttl_secs",
        ));
    }

    if doc.timeout_ms == Some(0) {
        return Err(CascadeError::invalid_configuration(
            "timeout_ms must be greater than 0",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        AnthropicOptions, CachingOptions, GenerationParameters, GoogleOptions, ProviderOptions,
        ThinkingOptions,
    };

    fn minimal() -> ConfigDocument {
        serde_yaml::from_str("provider: anthropic\nmodel: claude-sonnet\n").unwrap()
    }

    #[test]
    fn test_minimal_document_is_valid() {
        assert!(validate_document(&minimal()).is_ok());
    }

    #[test]
    fn test_unknown_key_rejected_by_schema() {
        let result: Result<ConfigDocument, _> =
            serde_yaml::from_str("provider: x\nmodel: y\nmodle: z\n");
        assert!(result.is_err());

        let nested: Result<ConfigDocument, _> =
            serde_yaml::from_str("provider: x\nmodel: y\nparameters:\n  temprature: 0.1\n");
        assert!(nested.is_err());
    }

    #[test]
    fn test_wrong_type_rejected_by_schema() {
        let result: Result<ConfigDocument, _> =
            serde_yaml::from_str("provider: x\nmodel: y\ntimeout_ms: soon\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_thinking_budget_below_minimum() {
        let mut doc = minimal();
        doc.provider_options = Some(ProviderOptions {
            anthropic: Some(AnthropicOptions {
                thinking: Some(ThinkingOptions {
                    enabled: true,
                    budget_tokens: 512,
                }),
            }),
            ..Default::default()
        });
        assert!(validate_document(&doc).is_err());

        // disabled thinking does not enforce the floor
        if let Some(thinking) = doc
            .provider_options
            .as_mut()
            .and_then(|o| o.anthropic.as_mut())
            .and_then(|a| a.thinking.as_mut())
        {
            thinking.enabled = false;
        }
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_google_budget_zero_disables() {
        let mut doc = minimal();
        doc.provider_options = Some(ProviderOptions {
            google: Some(GoogleOptions {
                thinking_budget: Some(0),
            }),
            ..Default::default()
        });
        assert!(validate_document(&doc).is_ok());

        doc.provider_options = Some(ProviderOptions {
            google: Some(GoogleOptions {
                thinking_budget: Some(64),
            }),
            ..Default::default()
        });
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn test_legacy_and_new_caching_conflict() {
        let mut doc = minimal();
        doc.cache_ttl_secs = Some(300);
        assert!(validate_document(&doc).is_ok());
        assert_eq!(doc.cache_ttl_secs(), Some(300));

        doc.caching = Some(CachingOptions {
            enabled: true,
            ttl_secs: Some(600),
        });
        let err = validate_document(&doc).unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_parameter_ranges() {
        let mut doc = minimal();
        doc.parameters = Some(GenerationParameters {
            temperature: Some(2.5),
            ..Default::default()
        });
        assert!(validate_document(&doc).is_err());

        doc.parameters = Some(GenerationParameters {
            temperature: Some(0.3),
            top_p: Some(0.9),
            max_tokens: Some(4096),
            ..Default::default()
        });
        assert!(validate_document(&doc).is_ok());
    }
}
