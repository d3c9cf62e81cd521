use std::{fs, path::Path};

use anyhow::Context;
use interaction_core::ControllerConfig;
use serde::Deserialize;

const DEFAULT_SETTINGS_FILE: &str = "folio.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_filter: String,
    pub submit_endpoint: Option<String>,
    pub controller: ControllerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            submit_endpoint: None,
            controller: ControllerConfig::default(),
        }
    }
}

/// Shape of `folio.toml`: tool keys at the top level, one table per behavior.
#[derive(Debug, Deserialize)]
struct FileSettings {
    log_filter: Option<String>,
    submit_endpoint: Option<String>,
    #[serde(flatten)]
    controller: ControllerConfig,
}

/// Defaults, then the settings file, then `FOLIO__*` environment overrides.
///
/// An explicit `path` must exist; the default `folio.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read settings '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_SETTINGS_FILE).ok(),
    };
    if let Some(raw) = raw {
        let file = parse_settings_file(&raw).with_context(|| {
            format!(
                "invalid settings in '{}'",
                path.map(|p| p.display().to_string())
                    .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string())
            )
        })?;
        apply_file(&mut settings, file);
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn parse_settings_file(raw: &str) -> anyhow::Result<FileSettings> {
    Ok(toml::from_str(raw)?)
}

fn apply_file(settings: &mut Settings, file: FileSettings) {
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file.submit_endpoint {
        settings.submit_endpoint = Some(v);
    }
    settings.controller = file.controller;
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("FOLIO__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = var("FOLIO__SUBMIT_ENDPOINT") {
        settings.submit_endpoint = Some(v).filter(|endpoint| !endpoint.is_empty());
    }

    let controller = &mut settings.controller;
    if let Some(v) = var("FOLIO__STATUS_HIDE_AFTER_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            controller.contact.status_hide_after_ms = parsed;
        }
    }
    if let Some(v) = var("FOLIO__HEADER_THRESHOLD_PX") {
        if let Ok(parsed) = v.parse::<f64>() {
            controller.header.threshold_px = parsed;
        }
    }
    if let Some(v) = var("FOLIO__ANCHOR_OFFSET_PX") {
        if let Ok(parsed) = v.parse::<f64>() {
            controller.anchors.header_offset_px = parsed;
        }
    }
    if let Some(v) = var("FOLIO__MENU_BREAKPOINT_PX") {
        if let Ok(parsed) = v.parse::<f64>() {
            controller.menu.breakpoint_px = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
