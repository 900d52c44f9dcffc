use super::{normalize_base_uri, settings_from, Settings};

use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = settings_from(None, no_env).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.base_uri, "/");
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        bind_addr = "0.0.0.0:9000"
        base_uri = "admin"
        tool_version = "4.0.3"
    "#;
    let settings = settings_from(Some(raw), no_env).expect("settings");
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.base_uri, "/admin/");
    assert_eq!(settings.tool_version, "4.0.3");
    assert_eq!(settings.resources_uri, "/resources");
}

#[test]
fn env_overrides_file() {
    let raw = r#"bind_addr = "0.0.0.0:9000""#;
    let env: HashMap<&str, &str> = [
        ("APP__BIND_ADDR", "127.0.0.1:7000"),
        ("APP__FRAMEWORK_VERSION", "axum 0.7.9"),
        ("APP__RESOURCES_DIR", "./resources"),
    ]
    .into_iter()
    .collect();

    let settings = settings_from(Some(raw), |key| env.get(key).map(|v| v.to_string()))
        .expect("settings");
    assert_eq!(settings.server_bind, "127.0.0.1:7000");
    assert_eq!(settings.framework_version, "axum 0.7.9");
    assert_eq!(settings.resources_dir.as_deref(), Some("./resources"));
}

#[test]
fn malformed_file_is_an_error() {
    assert!(settings_from(Some("bind_addr = ["), no_env).is_err());
}

#[test]
fn base_uri_is_normalized() {
    assert_eq!(normalize_base_uri(""), "/");
    assert_eq!(normalize_base_uri("//"), "/");
    assert_eq!(normalize_base_uri("/tools"), "/tools/");
    assert_eq!(normalize_base_uri(" tools/admin/ "), "/tools/admin/");
}
