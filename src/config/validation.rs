//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and URL shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs on the raw file contents, before zero values are normalized

use std::fmt;

use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(callback) = config.webhook_callback.as_deref().filter(|c| !c.is_empty()) {
        match Url::parse(callback) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError {
                field: "webhook_callback",
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError {
                field: "webhook_callback",
                message: format!("not an absolute URL: {}", e),
            }),
        }
    }

    if config.debug_level > 3 {
        errors.push(ValidationError {
            field: "debug_level",
            message: format!("must be between 0 and 3, got {}", config.debug_level),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
