//! Simplified Mailmine API
//!
//! This module provides the one-stop interface most callers need: load the
//! rules and any saved discovery state once, then extract from as many
//! messages as you like.

use crate::Result;
use crate::config::{ConfigBuilder, LogLevel, MailmineConfig, RulesConfig, validation};
use crate::discovery::{
    CheckpointStore, CorpusSource, DiscoveryOutcome, DiscoveryRecord, DiscoveryReport, Discoverer,
    RetryPolicy,
};
use crate::extraction::{ExtractionResult, PatternExtractor, UniversalExtractor};
use crate::noise::NoiseClassifier;
use crate::rules::RuleLibrary;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Simplified Mailmine interface
///
/// # Examples
///
/// ```rust
/// use mailmine::Mailmine;
///
/// async fn example() -> mailmine::Result<()> {
///     let mailmine = Mailmine::new().await?;
///     let result = mailmine.extract("Ticket TS-1818562 opened");
///     for candidate in &result.high_confidence {
///         println!("{} {:.2}", candidate.value, candidate.confidence);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Mailmine {
    config: MailmineConfig,
    rules: Arc<RuleLibrary>,
    noise: NoiseClassifier,
    extractor: UniversalExtractor,
    record: Option<DiscoveryRecord>,
}

async fn load_rules(config: &RulesConfig) -> Result<RuleLibrary> {
    let Some(path) = &config.file else {
        return Ok(RuleLibrary::builtin());
    };

    let mut rules = RuleLibrary::from_json_file(path).await?;
    if config.merge_builtin {
        rules.merge(RuleLibrary::builtin());
    }
    info!(
        path = %path.display(),
        rules = rules.len(),
        rejected = rules.rejected().len(),
        "Loaded rule library"
    );
    Ok(rules)
}

impl Mailmine {
    /// Create an instance with the built-in rules and default settings
    ///
    /// Does not install a logging subscriber; use [`crate::init`] for that.
    pub async fn new() -> Result<Self> {
        Self::from_config(MailmineConfig::default()).await
    }

    /// Create an instance from a configuration
    ///
    /// Loads the rule library (the configured file or the built-in table)
    /// and, when a checkpoint path is configured and the file exists, the
    /// saved discovery record.
    pub async fn from_config(config: MailmineConfig) -> Result<Self> {
        validation::validate_config(&config)?;

        let rules = Arc::new(load_rules(&config.rules).await?);
        let noise = NoiseClassifier::new(&config.noise);

        let record = match &config.discovery.checkpoint_path {
            Some(path) => {
                CheckpointStore::new(path)
                    .with_retry_policy(RetryPolicy::from(&config.discovery.retry))
                    .load()
                    .await?
            }
            None => None,
        };

        let extractor = Self::build_extractor(&config, &rules, &noise, record.as_ref());
        Ok(Self {
            config,
            rules,
            noise,
            extractor,
            record,
        })
    }

    /// Create a builder for a customised instance
    pub fn builder() -> MailmineBuilder {
        MailmineBuilder::new()
    }

    fn build_extractor(
        config: &MailmineConfig,
        rules: &Arc<RuleLibrary>,
        noise: &NoiseClassifier,
        record: Option<&DiscoveryRecord>,
    ) -> UniversalExtractor {
        let mut builder = UniversalExtractor::builder()
            .rules(rules.clone())
            .config(config.extraction.clone())
            .noise(noise.clone());
        if let Some(record) = record {
            builder = builder.discovery(record);
        }
        builder.build()
    }

    /// Extract identifier candidates from one message
    pub fn extract(&self, text: &str) -> ExtractionResult {
        self.extractor.extract(text)
    }

    /// The underlying extractor, for sharing across threads
    pub fn extractor(&self) -> &UniversalExtractor {
        &self.extractor
    }

    /// A discoverer configured from this instance's settings
    ///
    /// Attach a cancel flag or progress callback, run it, then hand the
    /// record back with [`set_discovery`](Self::set_discovery).
    pub fn discoverer(&self) -> Discoverer {
        Discoverer::new(self.config.discovery.clone())
    }

    /// Run discovery over a corpus and adopt the resulting record
    pub async fn discover(&mut self, corpus: &dyn CorpusSource) -> Result<DiscoveryOutcome> {
        let mut discoverer = self.discoverer();
        let outcome = discoverer.run(corpus).await?;
        self.set_discovery(discoverer.into_record());
        Ok(outcome)
    }

    /// Use a discovery record to score structural matches
    pub fn set_discovery(&mut self, record: DiscoveryRecord) {
        self.extractor =
            Self::build_extractor(&self.config, &self.rules, &self.noise, Some(&record));
        self.record = Some(record);
    }

    /// The loaded discovery record, if any
    pub fn discovery(&self) -> Option<&DiscoveryRecord> {
        self.record.as_ref()
    }

    /// Summarise the loaded discovery record
    pub fn report(&self) -> Option<DiscoveryReport> {
        self.record
            .as_ref()
            .map(|record| DiscoveryReport::build(record, &self.config.discovery, &self.noise))
    }

    /// The loaded rule library
    pub fn rules(&self) -> &RuleLibrary {
        &self.rules
    }

    /// Human-readable listing of each category's top rules
    pub fn prompt_summary(&self, top_n: usize) -> String {
        self.rules.prompt_summary(top_n)
    }

    /// The noise classifier in use
    pub fn noise(&self) -> &NoiseClassifier {
        &self.noise
    }

    /// The active configuration
    pub fn config(&self) -> &MailmineConfig {
        &self.config
    }
}

/// Builder for creating customised Mailmine instances
#[derive(Debug, Default)]
pub struct MailmineBuilder {
    config_builder: ConfigBuilder,
}

impl MailmineBuilder {
    fn new() -> Self {
        Self {
            config_builder: ConfigBuilder::new(),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: MailmineConfig) -> Self {
        self.config_builder = ConfigBuilder::from_config(config);
        self
    }

    /// Load verified rules from a JSON file
    pub fn with_rules_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_builder = self.config_builder.with_rules_file(path);
        self
    }

    /// Persist and resume discovery at this path
    pub fn with_checkpoint_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_builder = self.config_builder.with_checkpoint_path(path);
        self
    }

    /// Set the reporting frequency threshold
    pub fn with_min_frequency(mut self, min_frequency: u64) -> Self {
        self.config_builder = self.config_builder.with_min_frequency(min_frequency);
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config_builder = self.config_builder.with_log_level(level);
        self
    }

    /// Build the Mailmine instance, initialising logging
    pub async fn build(self) -> Result<Mailmine> {
        let config = self.config_builder.build()?;
        crate::init(config).await
    }
}
