use learner_core::{LearnerConfig, RetrievalFailurePolicy, RouterConfig};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_empty_config_uses_calibrated_defaults() {
    let config = LearnerConfig::from_toml_str("").expect("Empty config is valid");

    assert_eq!(*config.router().direct_below(), 0.7);
    assert_eq!(*config.router().clarify_at_or_above(), 1.1);
    assert_eq!(config.generation().stop(), &vec!["Question:", "Answer:"]);
    assert_eq!(*config.generation().max_tokens(), 1024);
    assert_eq!(*config.generation().temperature(), 0.2);
    assert_eq!(config.generation().timeout(), None);
    assert_eq!(*config.reply().max_chars(), 2000);
    assert_eq!(
        *config.retrieval().on_failure(),
        RetrievalFailurePolicy::Apologize
    );
}

#[test]
fn test_thresholds_are_recalibrated_from_toml() {
    let config = LearnerConfig::from_toml_str(
        r#"
        [router]
        direct_below = 0.35
        clarify_at_or_above = 0.6

        [generation]
        timeout_secs = 90

        [retrieval]
        on_failure = "clarify"
        "#,
    )
    .expect("Valid config");

    assert_eq!(*config.router().direct_below(), 0.35);
    assert_eq!(*config.router().clarify_at_or_above(), 0.6);
    assert_eq!(config.generation().timeout(), Some(Duration::from_secs(90)));
    assert_eq!(
        *config.retrieval().on_failure(),
        RetrievalFailurePolicy::Clarify
    );
    // Untouched fields in a partially specified section keep their defaults.
    assert_eq!(*config.generation().max_tokens(), 1024);
}

#[test]
fn test_inverted_thresholds_are_rejected() {
    let err = LearnerConfig::from_toml_str(
        r#"
        [router]
        direct_below = 1.2
        clarify_at_or_above = 1.1
        "#,
    )
    .expect_err("Inverted bands must fail");

    assert!(err.to_string().contains("direct_below"));
}

#[test]
fn test_out_of_range_temperature_is_rejected() {
    let result = LearnerConfig::from_toml_str(
        r#"
        [generation]
        temperature = 1.5
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_unknown_policy_fails_to_parse() {
    let result = LearnerConfig::from_toml_str(
        r#"
        [retrieval]
        on_failure = "ignore"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("Temp file");
    writeln!(file, "[reply]\nmax_chars = 500").expect("Write config");

    let config = LearnerConfig::from_file(file.path()).expect("Load config");
    assert_eq!(*config.reply().max_chars(), 500);
}

#[test]
fn test_missing_file_is_a_config_error() {
    let result = LearnerConfig::from_file("/nonexistent/learner.toml");
    assert!(result.is_err());
}

#[test]
fn test_builder_defaults_match_serde_defaults() {
    let built = LearnerConfig::builder()
        .router(RouterConfig::builder().direct_below(0.5).build())
        .build();

    assert_eq!(*built.router().direct_below(), 0.5);
    assert_eq!(*built.router().clarify_at_or_above(), 1.1);
    assert_eq!(built.generation(), LearnerConfig::default().generation());
    assert!(built.validate().is_ok());
}
