use super::{load_settings_with, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("cargo_picker_config_test_{suffix}"));
    fs::create_dir_all(&root).expect("temp root");
    let path = root.join("cargo-picker.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_when_no_file_or_env() {
    let settings = load_settings_with(
        &env::temp_dir().join("cargo_picker_missing_settings.toml"),
        env_from(&[]),
    );
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.request_timeout(), Duration::from_secs(15));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        r#"
api_base_url = "https://rotas.example.com"
request_timeout_secs = 30
auth_token = "abc"
"#,
    );

    let settings = load_settings_with(&path, env_from(&[]));

    assert_eq!(settings.api_base_url, "https://rotas.example.com");
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.auth_token.as_deref(), Some("abc"));
    assert_eq!(
        settings.active_route_path,
        Settings::default().active_route_path
    );

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let path = temp_settings_file("api_base_url = \"https://file.example.com\"\n");

    let settings = load_settings_with(
        &path,
        env_from(&[
            ("CARGO_PICKER_API_URL", "https://short.example.com"),
            ("APP__API_BASE_URL", "https://app.example.com"),
            ("CARGO_PICKER_TOKEN", "short-token"),
            ("APP__ACTIVE_ROUTE_PATH", "/tmp/route.json"),
        ]),
    );

    assert_eq!(settings.api_base_url, "https://app.example.com");
    assert_eq!(settings.auth_token.as_deref(), Some("short-token"));
    assert_eq!(settings.active_route_path, "/tmp/route.json");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn invalid_numeric_override_is_ignored() {
    let settings = load_settings_with(
        &env::temp_dir().join("cargo_picker_missing_settings.toml"),
        env_from(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]),
    );
    assert_eq!(settings.request_timeout_secs, 15);
}

#[test]
fn blank_token_counts_as_unauthenticated() {
    let settings = load_settings_with(
        &env::temp_dir().join("cargo_picker_missing_settings.toml"),
        env_from(&[("APP__AUTH_TOKEN", "   ")]),
    );
    assert_eq!(settings.auth_token, None);
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    let path = temp_settings_file("api_base_url = [");

    let settings = load_settings_with(&path, env_from(&[]));
    assert_eq!(settings, Settings::default());

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn zero_timeout_is_clamped() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}
