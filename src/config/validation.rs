//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (settle window > 0, currency decimals sane)
//! - Detect duplicate chain definitions
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HubConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::config::schema::HubConfig;

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &HubConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.discovery.settle_window_ms == 0 {
        errors.push(ValidationError {
            field: "discovery.settle_window_ms".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let mut seen_ids = HashSet::new();
    for (index, chain) in config.chains.iter().enumerate() {
        let field = |name: &str| format!("chains[{index}].{name}");

        if !seen_ids.insert(chain.id) {
            errors.push(ValidationError {
                field: field("id"),
                message: format!("duplicate chain id {}", chain.id),
            });
        }
        if chain.name.trim().is_empty() {
            errors.push(ValidationError {
                field: field("name"),
                message: "must not be empty".to_string(),
            });
        }
        if chain.rpc_urls.is_empty() {
            errors.push(ValidationError {
                field: field("rpc_urls"),
                message: "at least one RPC URL is required".to_string(),
            });
        }
        for (url_index, rpc_url) in chain.rpc_urls.iter().enumerate() {
            if Url::parse(rpc_url).is_err() {
                errors.push(ValidationError {
                    field: field(&format!("rpc_urls[{url_index}]")),
                    message: format!("invalid URL: {rpc_url}"),
                });
            }
        }
        if chain.native_currency.decimals == 0 {
            errors.push(ValidationError {
                field: field("native_currency.decimals"),
                message: "must be greater than zero".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::chains::{ChainDefinition, NativeCurrency};

    fn chain(id: u64) -> ChainDefinition {
        ChainDefinition {
            id,
            name: format!("Chain {id}"),
            native_currency: NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://rpc.example.org".to_string()],
            block_explorer_url: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&HubConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut config = HubConfig::default();
        config.discovery.settle_window_ms = 0;
        let mut bad_chain = chain(1);
        bad_chain.rpc_urls = vec!["not a url".to_string()];
        config.chains = vec![chain(1), bad_chain];

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"discovery.settle_window_ms"));
        assert!(fields.contains(&"chains[1].id"));
        assert!(fields.contains(&"chains[1].rpc_urls[0]"));
    }

    #[test]
    fn test_empty_rpc_list_is_rejected() {
        let mut config = HubConfig::default();
        let mut bad = chain(5);
        bad.rpc_urls.clear();
        config.chains = vec![bad];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "chains[0].rpc_urls");
    }
}
