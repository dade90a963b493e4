#[cfg(test)]
mod tests {
    use crate::config::{
        ConfigBuilder, ConfigLoader, ConfidenceTier, LogLevel, MailmineConfig, validation,
    };
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = MailmineConfig::default();
        assert_eq!(config.discovery.batch_size, 1000);
        assert_eq!(config.discovery.checkpoint_every, 1);
        assert_eq!(config.discovery.min_frequency, 50);
        assert_eq!(config.discovery.min_distinct_per_structure, 3);
        assert_eq!(config.noise.min_length, 2);
        assert_eq!(config.extraction.structural_min_length, 3);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.rules.file.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_batch_size(250)
            .with_min_frequency(5)
            .with_checkpoint_path("/tmp/mailmine/checkpoint.json")
            .with_rules_file("/tmp/mailmine/rules.json")
            .with_log_level(LogLevel::Debug)
            .build()
            .unwrap();

        assert_eq!(config.discovery.batch_size, 250);
        assert_eq!(config.discovery.min_frequency, 5);
        assert_eq!(
            config.discovery.checkpoint_path,
            Some(PathBuf::from("/tmp/mailmine/checkpoint.json"))
        );
        assert_eq!(
            config.rules.file,
            Some(PathBuf::from("/tmp/mailmine/rules.json"))
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_validation() {
        let config = MailmineConfig::default();
        assert!(validation::validate_config(&config).is_ok());

        assert!(ConfigBuilder::new().with_batch_size(0).build().is_err());
        assert!(ConfigBuilder::new().with_checkpoint_every(0).build().is_err());
        assert!(ConfigBuilder::new().with_min_distinct_per_structure(0).build().is_err());
        assert!(ConfigBuilder::new().with_high_confidence_threshold(1.5).build().is_err());
        assert!(ConfigBuilder::new().with_min_row_fraction(2.0).build().is_err());
    }

    #[test]
    fn test_tier_validation_requires_monotonic_policy() {
        let descending = vec![
            ConfidenceTier { min_count: 1000, confidence: 0.9 },
            ConfidenceTier { min_count: 100, confidence: 0.7 },
        ];
        assert!(validation::validate_tiers(&descending, 0.5).is_ok());

        let inverted = vec![
            ConfidenceTier { min_count: 1000, confidence: 0.6 },
            ConfidenceTier { min_count: 100, confidence: 0.7 },
        ];
        assert!(validation::validate_tiers(&inverted, 0.5).is_err());

        let unordered = vec![
            ConfidenceTier { min_count: 100, confidence: 0.9 },
            ConfidenceTier { min_count: 1000, confidence: 0.7 },
        ];
        assert!(validation::validate_tiers(&unordered, 0.5).is_err());

        let below_base = vec![ConfidenceTier { min_count: 10, confidence: 0.4 }];
        assert!(validation::validate_tiers(&below_base, 0.5).is_err());
    }

    #[test]
    fn test_loader_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailmine.toml");
        std::fs::write(
            &path,
            r#"
[discovery]
batch_size = 200
min_frequency = 7

[extraction]
keyword_boost = 0.2

[logging]
level = "warn"
"#,
        )
        .unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(&path).unwrap();
        let config = loader.extract().unwrap();

        assert_eq!(config.discovery.batch_size, 200);
        assert_eq!(config.discovery.min_frequency, 7);
        assert!((config.extraction.keyword_boost - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.logging.level, LogLevel::Warn);
        // Untouched sections keep their defaults
        assert_eq!(config.noise.min_length, 2);
    }

    #[test]
    fn test_loader_rejects_unknown_format_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ini = dir.path().join("mailmine.ini");
        std::fs::write(&ini, "batch_size=1").unwrap();

        let mut loader = ConfigLoader::new();
        assert!(loader.load_file(&ini).is_err());
        assert!(loader.load_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_loader_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailmine.json");
        std::fs::write(&path, r#"{"discovery": {"batch_size": 0}}"#).unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(&path).unwrap();
        assert!(loader.extract().is_err());
    }
}
