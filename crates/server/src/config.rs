use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "webtools.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub base_uri: String,
    pub resources_uri: String,
    pub resources_dir: Option<String>,
    pub tool_version: String,
    pub framework_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            base_uri: "/".into(),
            resources_uri: "/resources".into(),
            resources_dir: None,
            tool_version: env!("CARGO_PKG_VERSION").into(),
            framework_version: "axum 0.7".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    base_uri: Option<String>,
    resources_uri: Option<String>,
    resources_dir: Option<String>,
    tool_version: Option<String>,
    framework_version: Option<String>,
}

/// Reads `path` if it exists, then applies environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };

    settings_from(raw.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid settings in '{}'", path.display()))
}

fn settings_from(
    raw: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = raw {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.bind_addr {
            settings.server_bind = v;
        }
        if let Some(v) = file_cfg.base_uri {
            settings.base_uri = v;
        }
        if let Some(v) = file_cfg.resources_uri {
            settings.resources_uri = v;
        }
        if let Some(v) = file_cfg.resources_dir {
            settings.resources_dir = Some(v);
        }
        if let Some(v) = file_cfg.tool_version {
            settings.tool_version = v;
        }
        if let Some(v) = file_cfg.framework_version {
            settings.framework_version = v;
        }
    }

    if let Some(v) = env("WEBTOOLS_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BASE_URI") {
        settings.base_uri = v;
    }
    if let Some(v) = env("APP__RESOURCES_URI") {
        settings.resources_uri = v;
    }
    if let Some(v) = env("APP__RESOURCES_DIR") {
        settings.resources_dir = Some(v);
    }
    if let Some(v) = env("APP__TOOL_VERSION") {
        settings.tool_version = v;
    }
    if let Some(v) = env("APP__FRAMEWORK_VERSION") {
        settings.framework_version = v;
    }

    settings.base_uri = normalize_base_uri(&settings.base_uri);
    Ok(settings)
}

/// Base uris always start and end with a slash.
pub fn normalize_base_uri(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    format!("/{trimmed}/")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
