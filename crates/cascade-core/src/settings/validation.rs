//! Settings validation

use super::types::EngineSettings;
use crate::error::{CascadeError, CascadeResult};
use crate::validation::validate_scope;

/// Upper bound on shared tier reconnection retries
pub const MAX_SHARED_RETRIES: u32 = 100;

impl EngineSettings {
    /// Check the settings are usable, reporting every problem at once
    pub fn validate(&self) -> CascadeResult<()> {
        let mut errors = Vec::new();

        if self.config_root.as_os_str().is_empty() {
            errors.push("config_root must not be empty".to_string());
        }
        if let Err(e) = validate_scope(&self.default_scope) {
            errors.push(format!("default_scope: {}", e));
        }
        if self.warned_capacity == 0 {
            errors.push("warned_capacity must be greater than 0".to_string());
        }
        if self.local.max_size == 0 {
            errors.push("local.max_size must be greater than 0".to_string());
        }
        if self.local.ttl_secs == 0 {
            errors.push("local.ttl_secs must be greater than 0".to_string());
        }
        if self.shared.ttl_secs == 0 {
            errors.push("shared.ttl_secs must be greater than 0".to_string());
        }
        if self.shared.connect_timeout_ms == 0 {
            errors.push("shared.connect_timeout_ms must be greater than 0".to_string());
        }
        if self.shared.command_timeout_ms == 0 {
            errors.push("shared.command_timeout_ms must be greater than 0".to_string());
        }
        if self.shared.max_retries > MAX_SHARED_RETRIES {
            errors.push(format!(
                "shared.max_retries must be at most {} (got {})",
                MAX_SHARED_RETRIES, self.shared.max_retries
            ));
        }
        if self.shared.key_prefix.is_empty() {
            errors.push("shared.key_prefix must not be empty".to_string());
        }
        if self.shared.invalidation_channel.is_empty() {
            errors.push("shared.invalidation_channel must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CascadeError::settings(format!(
                "Settings validation failed:\n- {}",
                errors.join("\n- ")
            )))
        }
    }
}
