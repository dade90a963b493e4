//! Configuration validation utilities.
//!
//! This module provides validation functions for configuration values.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &MailmineConfig) -> Result<(), ConfigError> {
    validate_noise_config(&config.noise)?;
    validate_discovery_config(&config.discovery)?;
    validate_extraction_config(&config.extraction)?;

    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

fn check_unit(name: &str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{} must be within [0, 1], got {}", name, value)));
    }
    Ok(())
}

/// Validate noise configuration.
fn validate_noise_config(config: &NoiseConfig) -> Result<(), ConfigError> {
    if config.min_length == 0 {
        return Err(invalid("noise.min_length must be greater than 0"));
    }
    if config.css_prefixes.iter().any(|p| p.is_empty()) {
        return Err(invalid("noise.css_prefixes cannot contain empty entries"));
    }
    if config.css_suffixes.iter().any(|s| s.is_empty()) {
        return Err(invalid("noise.css_suffixes cannot contain empty entries"));
    }
    Ok(())
}

/// Validate discovery configuration.
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    if config.batch_size == 0 {
        return Err(invalid("discovery.batch_size must be greater than 0"));
    }
    if config.checkpoint_every == 0 {
        return Err(invalid("discovery.checkpoint_every must be greater than 0"));
    }
    if config.min_distinct_per_structure == 0 {
        return Err(invalid(
            "discovery.min_distinct_per_structure must be greater than 0",
        ));
    }
    if !(0.0..=1.0).contains(&config.min_row_fraction) {
        return Err(invalid("discovery.min_row_fraction must be within [0, 1]"));
    }
    if config.hint_radius == 0 {
        return Err(invalid("discovery.hint_radius must be greater than 0"));
    }
    if let Some(path) = &config.checkpoint_path
        && path.as_os_str().is_empty()
    {
        return Err(invalid("discovery.checkpoint_path cannot be empty"));
    }
    if config.retry.max_attempts == 0 {
        return Err(invalid("discovery.retry.max_attempts must be greater than 0"));
    }
    if config.retry.backoff_multiplier < 1.0 {
        return Err(invalid("discovery.retry.backoff_multiplier must be at least 1.0"));
    }
    Ok(())
}

/// Validate extraction configuration.
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.context_radius == 0 {
        return Err(invalid("extraction.context_radius must be greater than 0"));
    }
    if config.structural_min_length == 0 {
        return Err(invalid("extraction.structural_min_length must be greater than 0"));
    }
    if config.max_input_bytes == 0 {
        return Err(invalid("extraction.max_input_bytes must be greater than 0"));
    }
    check_unit("extraction.keyword_boost", config.keyword_boost)?;
    check_unit(
        "extraction.high_confidence_threshold",
        config.high_confidence_threshold,
    )?;
    check_unit(
        "extraction.structural_base_confidence",
        config.structural_base_confidence,
    )?;
    validate_tiers(&config.confidence_tiers, config.structural_base_confidence)
}

/// Tiers must be ordered by strictly descending count with non-increasing
/// confidence, and never drop below the base confidence, so that the derived
/// confidence is monotonic in the occurrence count.
pub fn validate_tiers(tiers: &[ConfidenceTier], base: f32) -> Result<(), ConfigError> {
    for tier in tiers {
        check_unit("extraction.confidence_tiers.confidence", tier.confidence)?;
        if tier.confidence < base {
            return Err(invalid(format!(
                "confidence tier for counts > {} is below the base confidence {}",
                tier.min_count, base
            )));
        }
    }

    for pair in tiers.windows(2) {
        if pair[0].min_count <= pair[1].min_count {
            return Err(invalid(
                "confidence tiers must be ordered by strictly descending min_count",
            ));
        }
        if pair[0].confidence < pair[1].confidence {
            return Err(invalid(
                "confidence tiers must not increase as min_count decreases",
            ));
        }
    }

    Ok(())
}
