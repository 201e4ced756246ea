// Unit tests for client configuration persistence

use crate::config::{CONFIG_FILE_NAME, ClientConfig};
use crate::transport::AuthLevel;

use std::time::Duration;

use tempfile::tempdir;

/// **VALUE**: Verifies the default configuration matches the constants the
/// session is documented to use.
///
/// **WHY THIS MATTERS**: A missing config file must behave exactly like the
/// documented defaults: Basic auth and the fixed 10ms reconnect poll.
#[test]
fn given_no_config_file_when_loaded_then_defaults_apply() {
    // GIVEN: A directory with no config file
    let dir = tempdir().unwrap();

    // WHEN: Loading
    let config = ClientConfig::load(dir.path()).unwrap();

    // THEN: Documented defaults
    assert_eq!(config.version, 1);
    assert_eq!(config.auth_level, AuthLevel::Basic);
    assert_eq!(config.retry_interval(), Duration::from_millis(10));
    assert_eq!(config.core_address, "localhost:7185");
}

/// **VALUE**: Verifies save/load round-trips a modified configuration.
///
/// **BUG THIS CATCHES**: Would catch serde field renames or a save path that
/// doesn't match the load path.
#[test]
fn given_saved_config_when_loaded_then_round_trips() {
    // GIVEN: A modified config saved to a temp dir
    let dir = tempdir().unwrap();
    let config = ClientConfig {
        auth_level: AuthLevel::Admin,
        retry_interval_ms: 50,
        ..ClientConfig::default()
    };
    config.save(dir.path()).unwrap();

    // WHEN: Loading it back
    let loaded = ClientConfig::load(dir.path()).unwrap();

    // THEN: Values survive
    assert_eq!(loaded.auth_level, AuthLevel::Admin);
    assert_eq!(loaded.retry_interval(), Duration::from_millis(50));
}

/// **VALUE**: Verifies partial config files are filled in with defaults.
///
/// **WHY THIS MATTERS**: Users hand-edit this file; omitting a field must
/// not make the client refuse to start.
#[test]
fn given_partial_config_file_when_loaded_then_missing_fields_default() {
    // GIVEN: A config file containing only the auth level
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{"auth_level":"None"}"#,
    )
    .unwrap();

    // WHEN: Loading
    let config = ClientConfig::load(dir.path()).unwrap();

    // THEN: Present field honored, absent fields defaulted
    assert_eq!(config.auth_level, AuthLevel::None);
    assert_eq!(config.retry_interval(), Duration::from_millis(10));
}

/// **VALUE**: Verifies corrupted files fail load() but not load_or_default().
///
/// **WHY THIS MATTERS**: The launcher uses load_or_default() so a corrupt
/// file degrades to defaults instead of preventing startup; load() still
/// reports the parse error for anything that wants to surface it.
#[test]
fn given_corrupt_config_file_when_loaded_then_error_or_defaults() {
    // GIVEN: An unparseable config file
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not json").unwrap();

    // WHEN / THEN: load() reports the parse error
    assert!(ClientConfig::load(dir.path()).is_err());

    // AND: load_or_default() degrades to defaults
    let config = ClientConfig::load_or_default(dir.path());
    assert_eq!(config.auth_level, AuthLevel::Basic);
}
