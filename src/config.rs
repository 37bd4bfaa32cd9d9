// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendtrack", "spendtrack"));

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const ENV_API_URL: &str = "SPENDTRACK_API_URL";
pub const ENV_TIMEOUT: &str = "SPENDTRACK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Shape of the optional `config.json`; every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
struct FileSettings {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")
}

pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn session_path() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("session.json"))
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl Settings {
    /// defaults < config file < environment < `--api-url`.
    pub fn load(cli_api_url: Option<&str>) -> Result<Settings> {
        let file = config_path().ok();
        let env = |k: &str| std::env::var(k).ok();
        Self::resolve(file.as_deref(), env, cli_api_url)
    }

    pub fn resolve(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        cli_api_url: Option<&str>,
    ) -> Result<Settings> {
        let mut s = Settings::default();

        if let Some(path) = file.filter(|p| p.exists()) {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Read config at {}", path.display()))?;
            let f: FileSettings = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid config at {}", path.display()))?;
            if let Some(u) = f.api_url {
                s.api_url = u;
            }
            if let Some(t) = f.timeout_secs {
                s.timeout_secs = t;
            }
        }

        if let Some(u) = env(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            s.api_url = u;
        }
        if let Some(t) = env(ENV_TIMEOUT) {
            s.timeout_secs = t
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} '{}'", ENV_TIMEOUT, t))?;
        }
        if let Some(u) = cli_api_url {
            s.api_url = u.to_string();
        }

        s.api_url = normalize_base_url(&s.api_url);
        if s.api_url.is_empty() {
            tracing::warn!("API URL is empty; falling back to {}", DEFAULT_API_URL);
            s.api_url = DEFAULT_API_URL.to_string();
        }
        Ok(s)
    }
}
