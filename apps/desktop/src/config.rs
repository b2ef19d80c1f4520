use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "cargo-picker.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub active_route_path: String,
    pub auth_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000".into(),
            request_timeout_secs: 15,
            active_route_path: "./data/active_route.json".into(),
            auth_token: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    active_route_path: Option<String>,
    auth_token: Option<String>,
}

pub fn load_settings() -> Settings {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file when present, then environment
/// overrides. The `APP__` form of a variable wins over its short form.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.active_route_path {
                    settings.active_route_path = v;
                }
                if let Some(v) = file_cfg.auth_token {
                    settings.auth_token = Some(v);
                }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("CARGO_PICKER_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if let Some(v) = env("APP__ACTIVE_ROUTE_PATH") {
        settings.active_route_path = v;
    }

    if let Some(v) = env("CARGO_PICKER_TOKEN") {
        settings.auth_token = Some(v);
    }
    if let Some(v) = env("APP__AUTH_TOKEN") {
        settings.auth_token = Some(v);
    }

    settings.auth_token = settings
        .auth_token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
