use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PRODX_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.output_dir, PathBuf::from("./output"));
    assert_eq!(cfg.max_input_bytes, 20_971_520);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("PRODX_ENV", "production");
    map.insert("PRODX_LOG_LEVEL", "prodx_extract=debug");
    map.insert("PRODX_OUTPUT_DIR", "/var/lib/prodx");
    map.insert("PRODX_MAX_INPUT_BYTES", "1024");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "prodx_extract=debug");
    assert_eq!(cfg.output_dir, PathBuf::from("/var/lib/prodx"));
    assert_eq!(cfg.max_input_bytes, 1024);
}

#[test]
fn build_app_config_rejects_invalid_max_input_bytes() {
    let mut map = HashMap::new();
    map.insert("PRODX_MAX_INPUT_BYTES", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRODX_MAX_INPUT_BYTES"),
        "expected InvalidEnvVar(PRODX_MAX_INPUT_BYTES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_max_input_bytes() {
    let mut map = HashMap::new();
    map.insert("PRODX_MAX_INPUT_BYTES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRODX_MAX_INPUT_BYTES"),
        "expected InvalidEnvVar(PRODX_MAX_INPUT_BYTES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_unknown_environment() {
    let mut map = HashMap::new();
    map.insert("PRODX_ENV", "qa");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRODX_ENV"),
        "expected InvalidEnvVar(PRODX_ENV), got: {result:?}"
    );
}
