use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use server_api::DEFAULT_LIST_LIMIT;

pub const SETTINGS_FILE: &str = "lostfound.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub allowed_origin: String,
    pub list_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/lostfound.db".into(),
            allowed_origin: "http://localhost:5173".into(),
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    database_url: Option<String>,
    allowed_origin: Option<String>,
    list_limit: Option<u32>,
}

/// Defaults, then `lostfound.toml`, then environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        match apply_file_settings(&mut settings, &raw) {
            Ok(()) => tracing::info!(file = SETTINGS_FILE, "loaded settings file"),
            Err(error) => {
                tracing::warn!(file = SETTINGS_FILE, %error, "ignoring unreadable settings file")
            }
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid settings toml")?;

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.allowed_origin {
        settings.allowed_origin = v;
    }
    if let Some(v) = file_cfg.list_limit {
        settings.list_limit = v;
    }
    Ok(())
}

/// Later keys in each list win over earlier ones.
fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let last_set = |keys: &[&str]| keys.iter().rev().find_map(|key| lookup(key));

    if let Some(v) = last_set(&["SERVER_BIND", "APP__BIND_ADDR"]) {
        settings.server_bind = v;
    }
    if let Some(v) = last_set(&["DATABASE_URL", "APP__DATABASE_URL"]) {
        settings.database_url = v;
    }
    if let Some(v) = last_set(&["APP__ALLOWED_ORIGIN"]) {
        settings.allowed_origin = v;
    }
    if let Some(v) = last_set(&["APP__LIST_LIMIT"]) {
        match v.parse::<u32>() {
            Ok(parsed) => settings.list_limit = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__LIST_LIMIT"),
        }
    }
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite://") {
        return sqlite_url_for_path(path);
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return sqlite_url_for_path(path);
    }

    if raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    sqlite_url_for_path(raw_database_url)
}

fn sqlite_url_for_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    if has_windows_drive_prefix(&path) {
        format!("sqlite:{path}")
    } else {
        format!("sqlite://{path}")
    }
}

fn has_windows_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
