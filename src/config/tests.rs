use super::validation::validate_config;
use super::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("waqt.toml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
fn test_missing_file_means_defaults() {
    let temp_dir = tempdir().unwrap();
    let config = load_from_path(&temp_dir.path().join("waqt.toml")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.geocode_url(), DEFAULT_GEOCODE_URL);
    assert_eq!(config.timings_url(), DEFAULT_TIMINGS_URL);
    assert_eq!(config.user_agent(), "PrayerTimesApp/1.0");
    assert_eq!(config.cache_ttl_hours(), 24);
    assert_eq!(config.debounce(), Duration::from_millis(300));
    assert_eq!(config.tick_interval(), Duration::from_secs(1));
    assert_eq!(config.default_method().id(), 2);
}

#[test]
fn test_full_config_parses() {
    let (_dir, path) = write_config(
        r#"
geocode_url = "http://localhost:8080"
timings_url = "http://localhost:9090/v1"
user_agent = "waqt-test/0.1"
request_timeout_secs = 5
cache_ttl_hours = 48
debounce_ms = 150
tick_interval_ms = 500
default_method = 3
"#,
    );
    let config = load_from_path(&path).unwrap();

    assert_eq!(config.geocode_url(), "http://localhost:8080");
    assert_eq!(config.timings_url(), "http://localhost:9090/v1");
    assert_eq!(config.user_agent(), "waqt-test/0.1");
    assert_eq!(config.request_timeout_secs(), 5);
    assert_eq!(config.cache_ttl_hours(), 48);
    assert_eq!(config.debounce(), Duration::from_millis(150));
    assert_eq!(config.tick_interval(), Duration::from_millis(500));
    assert_eq!(config.default_method().name(), "Muslim World League");
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let cases = [
        ("request_timeout_secs = 0", "request_timeout_secs"),
        ("request_timeout_secs = 121", "request_timeout_secs"),
        ("cache_ttl_hours = 169", "cache_ttl_hours"),
        ("debounce_ms = 10", "debounce_ms"),
        ("tick_interval_ms = 20000", "tick_interval_ms"),
        ("default_method = 6", "default_method"),
        ("default_method = 24", "default_method"),
        ("geocode_url = \"ftp://example.org\"", "geocode_url"),
        ("timings_url = \"https://\"", "timings_url"),
        ("user_agent = \"  \"", "user_agent"),
    ];

    for (line, field) in cases {
        let (_dir, path) = write_config(line);
        let err = load_from_path(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains(field), "{line}: {message}");
    }
}

#[test]
fn test_unknown_and_malformed_fields_fail_to_parse() {
    let (_dir, path) = write_config("debounce = 300");
    let err = load_from_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));

    let (_dir, path) = write_config("cache_ttl_hours = \"a day\"");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_validation_accepts_boundaries() {
    let config = Config {
        request_timeout_secs: Some(MAXIMUM_REQUEST_TIMEOUT_SECS),
        cache_ttl_hours: Some(MINIMUM_CACHE_TTL_HOURS),
        debounce_ms: Some(MAXIMUM_DEBOUNCE_MS),
        tick_interval_ms: Some(MINIMUM_TICK_INTERVAL_MS),
        default_method: Some(0),
        ..Default::default()
    };
    assert!(validate_config(&config).is_ok());
}

#[test]
#[serial]
fn test_config_path_follows_xdg_config_home() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("waqt");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("waqt.toml"), "cache_ttl_hours = 12").unwrap();

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let path = get_config_path();
    let result = Config::load();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    assert_eq!(path.unwrap(), config_dir.join("waqt.toml"));
    assert_eq!(result.unwrap().cache_ttl_hours(), 12);
}
