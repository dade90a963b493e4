//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::{Path, PathBuf};

/// Builder for creating MailmineConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: MailmineConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: MailmineConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: MailmineConfig) -> Self {
        Self { config }
    }

    /// Set the number of corpus rows per discovery batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.discovery.batch_size = batch_size;
        self
    }

    /// Set how many batches pass between checkpoints.
    pub fn with_checkpoint_every(mut self, batches: usize) -> Self {
        self.config.discovery.checkpoint_every = batches;
        self
    }

    /// Persist the discovery record at the given path.
    pub fn with_checkpoint_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.discovery.checkpoint_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Store the discovery checkpoint in the platform data directory.
    pub fn with_default_checkpoint(mut self) -> Self {
        let data_dir = directories::ProjectDirs::from("org", "mailmine", "mailmine")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));
        self.config.discovery.checkpoint_path = Some(data_dir.join("discovery_checkpoint.json"));
        self
    }

    /// Set the minimum occurrence count for reported patterns.
    pub fn with_min_frequency(mut self, min_frequency: u64) -> Self {
        self.config.discovery.min_frequency = min_frequency;
        self
    }

    /// Set the relative frequency threshold (fraction of processed rows).
    pub fn with_min_row_fraction(mut self, fraction: f64) -> Self {
        self.config.discovery.min_row_fraction = fraction;
        self
    }

    /// Set the distinct-values threshold for structural patterns.
    pub fn with_min_distinct_per_structure(mut self, distinct: usize) -> Self {
        self.config.discovery.min_distinct_per_structure = distinct;
        self
    }

    /// Load verified rules from a JSON file instead of the built-in table.
    pub fn with_rules_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.rules.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the built-in rules alongside a rules file.
    pub fn with_builtin_rules_merged(mut self, merge: bool) -> Self {
        self.config.rules.merge_builtin = merge;
        self
    }

    /// Set the high confidence threshold.
    pub fn with_high_confidence_threshold(mut self, threshold: f32) -> Self {
        self.config.extraction.high_confidence_threshold = threshold;
        self
    }

    /// Set the noise length bound applied to structural matches.
    pub fn with_structural_min_length(mut self, min_length: usize) -> Self {
        self.config.extraction.structural_min_length = min_length;
        self
    }

    /// Enable or disable generic structural templates during extraction.
    pub fn with_structural_templates(mut self, enabled: bool) -> Self {
        self.config.extraction.include_structural = enabled;
        self
    }

    /// Set the context radius used for keyword boosting.
    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.config.extraction.context_radius = radius;
        self
    }

    /// Replace the noise denylist configuration.
    pub fn with_noise_config(mut self, noise: NoiseConfig) -> Self {
        self.config.noise = noise;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Set the log file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable logging to stdout.
    pub fn with_stdout_logging(mut self, enabled: bool) -> Self {
        self.config.logging.stdout = enabled;
        self
    }

    /// Use default logging configuration.
    pub fn with_default_logging(mut self) -> Self {
        self.config.logging = LoggingConfig::default();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<MailmineConfig> {
        validation::validate_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
