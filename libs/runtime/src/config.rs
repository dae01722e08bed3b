use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

use crate::paths::home_dir::resolve_home_dir;

/// Application configuration with strongly-typed global sections
/// and a flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppSection,
    /// Restaurant REST backend the client talks to.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Base for relative log paths; normalized to an absolute path on load.
    #[serde(default)]
    pub home_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Root URL of the REST API, e.g. "https://restaurant-dz.onrender.com".
    pub base_url: String,
    /// Bearer token sent with every request. Authorization is enforced by the backend.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Per-request timeout; 0 disables it.
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

/// Logging configuration - maps target names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit targets.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/feast.log", empty disables the file
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_timeout_sec() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://restaurant-dz.onrender.com".to_string(),
            api_token: None,
            timeout_sec: default_timeout_sec(),
        }
    }
}

impl BackendConfig {
    /// Parsed `base_url`.
    pub fn url(&self) -> Result<Url> {
        Url::parse(self.base_url.trim())
            .with_context(|| format!("Invalid backend.base_url '{}'", self.base_url))
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "warn".to_string(),
            file: "logs/feast.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(20),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            backend: BackendConfig::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `app.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            // FEAST__BACKEND__BASE_URL=http://localhost:8080 maps to backend.base_url
            .merge(Env::prefixed("FEAST__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        normalize_home_dir_inplace(&mut config.app).context("Failed to resolve app.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.app)
                    .context("Failed to resolve app.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Typed view of one entry of the module bag; a missing entry yields `T::default()`.
    pub fn module_config<T>(&self, module_name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module_name) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid configuration for module '{module_name}'")),
            None => Ok(T::default()),
        }
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(base_url) = &args.base_url {
            self.backend.base_url = base_url.clone();
        }

        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(),
                1 => "info".to_string(),
                2 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }
}

/// Command line arguments that influence configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub base_url: Option<String>,
    pub verbose: u8,
    pub mock: bool,
}

const fn default_subdir() -> &'static str {
    ".feast"
}

fn normalize_home_dir_inplace(app: &mut AppSection) -> Result<()> {
    let opt = if app.home_dir.trim().is_empty() {
        None
    } else {
        Some(app.home_dir.clone())
    };

    let resolved: PathBuf = resolve_home_dir(opt, default_subdir(), true)?;
    app.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_yaml = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "yml" | "yaml"))
            .unwrap_or(false);
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_yaml {
            continue;
        }
        let raw = fs::read_to_string(&path)?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse module file {}", path.display()))?;
        bag.insert(name.to_string(), serde_json::to_value(val)?);
    }
    Ok(())
}
