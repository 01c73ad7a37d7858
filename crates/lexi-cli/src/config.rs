// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: Backend::default(),
            storage: Storage::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Backend {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("LEXI_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set LEXI_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(lexi_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put values under [backend], [storage], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `lexi --print-example-config` for the current layout",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            lexi_store::validate_db_path(db_path)?;
        }

        if let Some(timeout) = &self.backend.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "backend.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter, got {:?}; use a level such as \"info\" or \"lexi_backend=debug\"",
                    path.display(),
                    level
                )
            })?;
        }

        Ok(())
    }

    pub fn backend_url(&self) -> Result<&str> {
        match self.backend.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.trim_end_matches('/')),
            _ => bail!(
                "backend.url is not set; add it under [backend] (see `lexi --print-example-config`)"
            ),
        }
    }

    pub fn backend_anon_key(&self) -> Result<&str> {
        match self.backend.anon_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => bail!(
                "backend.anon_key is not set; copy the project's public anon key under [backend]"
            ),
        }
    }

    /// `[backend].access_token` wins; `LEXI_ACCESS_TOKEN` fills in when the
    /// file has none.
    pub fn access_token(&self) -> Option<String> {
        self.backend
            .access_token
            .clone()
            .or_else(|| env::var("LEXI_ACCESS_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
    }

    pub fn backend_timeout(&self) -> Result<Duration> {
        parse_duration(self.backend.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => lexi_store::default_db_path(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(lexi_store::data_dir()?.join("lexi.log")),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# lexi config\n# Place this file at: {}\n\nversion = 1\n\n[backend]\nurl = \"https://project.supabase.co\"\nanon_key = \"public-anon-key\"\n# Optional. Falls back to LEXI_ACCESS_TOKEN\n# access_token = \"...\"\ntimeout = \"{}\"\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/lexi/lexi.db)\n# db_path = \"/absolute/path/to/lexi.db\"\n\n[log]\n# LEXI_LOG overrides this filter\nlevel = \"{}\"\n# file = \"/absolute/path/to/lexi.log\"\n",
            path.display(),
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let (value, unit) = if let Some(value) = raw.strip_suffix("ms") {
        (value, Duration::from_millis(1))
    } else if let Some(value) = raw.strip_suffix('s') {
        (value, Duration::from_secs(1))
    } else if let Some(value) = raw.strip_suffix('m') {
        (value, Duration::from_secs(60))
    } else {
        bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
    };

    let count: u32 = value
        .parse()
        .with_context(|| format!("invalid timeout duration {raw:?}"))?;
    Ok(unit * count)
}
