//! Tests for simulation configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        iterations = 5000
        chunk_size = 250
        random_seed = 42
        thread_count = "none"
        confidence = "sampled"

        [electre]
        lambda = 0.6
        lambda_range = [0.55, 0.7]
        rule = "optimistic"
        veto = true
    "#;

    let config = SimulationConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.iterations, 5000);
    assert_eq!(config.chunk_size, 250);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.thread_count, ThreadCount::None);
    assert_eq!(config.confidence, ConfidenceMode::Sampled);
    let electre = config.electre.unwrap();
    assert_eq!(electre.rule, AssignmentRuleConfig::Optimistic);
    assert!(electre.veto);
    assert_eq!(electre.lambda_range, Some([0.55, 0.7]));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        iterations: 2000
        random_seed: 7
        thread_count: none
        electre:
          lambda: 0.8
    "#;

    let config = SimulationConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.iterations, 2000);
    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(config.thread_count, ThreadCount::None);
    assert_eq!(config.electre.unwrap().rule, AssignmentRuleConfig::Pessimistic);
}

#[test]
fn test_defaults_from_empty_document() {
    let config = SimulationConfig::from_toml_str("").unwrap();
    assert_eq!(config, SimulationConfig::default());
    assert_eq!(config.confidence, ConfidenceMode::ExpectedValues);
    assert_eq!(config.random_seed, None);
}

#[test]
fn test_builder() {
    let config = SimulationConfig::new()
        .with_iterations(100)
        .with_chunk_size(10)
        .with_random_seed(123)
        .with_thread_count(ThreadCount::Count(2))
        .with_confidence(ConfidenceMode::Sampled)
        .with_electre(ElectreConfig::default());

    assert_eq!(config.iterations, 100);
    assert_eq!(config.chunk_size, 10);
    assert_eq!(config.random_seed, Some(123));
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_rejects_zero_counts() {
    assert!(matches!(
        SimulationConfig::from_toml_str("iterations = 0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        SimulationConfig::from_toml_str("chunk_size = 0"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        SimulationConfig::from_toml_str("thread_count = { count = 0 }"),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_validation_rejects_lambda_out_of_range() {
    let err = SimulationConfig::from_toml_str("[electre]\nlambda = 1.5").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = SimulationConfig::from_toml_str("[electre]\nlambda_range = [0.9, 0.1]").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_lambda_interval_defaults_to_point() {
    let electre = ElectreConfig {
        lambda: 0.6,
        ..Default::default()
    };
    let range = electre.lambda_interval().unwrap();
    assert_eq!(range.lo(), 0.6);
    assert_eq!(range.width(), 0.0);
}

#[test]
fn test_thread_count_resolve() {
    assert_eq!(ThreadCount::None.resolve(), 1);
    assert_eq!(ThreadCount::Count(5).resolve(), 5);
    assert!(ThreadCount::Auto.resolve() >= 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SimulationConfig::load("/nonexistent/smaa.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
