//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/koi/koi.toml`
//! 3. Environment variables: `KOI_*` prefix (plus `KSHELL_*` for the shell pod)
//!
//! `USER` seeds the shell pod name prefix below the config file.
//!
//! The environment is read once; everything downstream receives `Settings`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::application::ApplicationError;
use crate::domain::FilterEnvironment;

pub const DEFAULT_KUBECTL: &str = "kubectl";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_SHELL_IMAGE: &str = "oliverisaac/alpine-nettools:latest";
pub const DEFAULT_SHELL_TIMEOUT: &str = "2m";

/// Settings for `koi shell`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub image: String,
    /// Fixed pod name; generated from `name_prefix` when unset.
    pub name: Option<String>,
    pub name_prefix: String,
    pub vi_mode: bool,
    pub timeout: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_SHELL_IMAGE.to_string(),
            name: None,
            name_prefix: "koi".to_string(),
            vi_mode: false,
            timeout: DEFAULT_SHELL_TIMEOUT.to_string(),
        }
    }
}

/// Unified configuration for koi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Wrapped executable (default: kubectl)
    pub kubectl_exe: String,
    /// Context injected when none is given on the command line
    pub context: Option<String>,
    /// Namespace injected when none is given on the command line
    pub namespace: Option<String>,
    pub log_level: String,
    pub shell: ShellConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kubectl_exe: DEFAULT_KUBECTL.to_string(),
            context: None,
            namespace: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            shell: ShellConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawShellConfig {
    pub image: Option<String>,
    pub name_prefix: Option<String>,
    pub vi_mode: Option<bool>,
    pub timeout: Option<String>,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub kubectl_exe: Option<String>,
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub log_level: Option<String>,
    pub shell: RawShellConfig,
}

/// Get the XDG config directory for koi.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "koi").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("koi.toml"))
}

/// Collect environment variables into a settings source.
///
/// Names that are not UTF-8 cannot be koi variables and are skipped; values
/// are converted lossily.
pub fn environment_snapshot<I>(vars: I) -> Map<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            Some((key, value.to_string_lossy().into_owned()))
        })
        .collect()
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load from the global config file and the process environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(
            global_config_path().as_deref(),
            environment_snapshot(std::env::vars_os()),
        )
    }

    /// Load with an explicit config file and environment snapshot.
    pub fn load_from(
        config_file: Option<&Path>,
        env: Map<String, String>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();
        // the login name only replaces the compiled default prefix
        if let Some(user) = env.get("USER").filter(|u| !u.is_empty()) {
            current.shell.name_prefix = user.clone();
        }

        if let Some(path) = config_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.apply_file(&raw);
            }
        }

        current = current.apply_env_overrides(env)?;
        current.expand_paths();
        Ok(current)
    }

    fn apply_file(&self, raw: &RawSettings) -> Self {
        Self {
            kubectl_exe: raw
                .kubectl_exe
                .clone()
                .unwrap_or_else(|| self.kubectl_exe.clone()),
            context: raw.context.clone().or_else(|| self.context.clone()),
            namespace: raw.namespace.clone().or_else(|| self.namespace.clone()),
            log_level: raw
                .log_level
                .clone()
                .unwrap_or_else(|| self.log_level.clone()),
            shell: ShellConfig {
                image: raw
                    .shell
                    .image
                    .clone()
                    .unwrap_or_else(|| self.shell.image.clone()),
                name: self.shell.name.clone(),
                name_prefix: raw
                    .shell
                    .name_prefix
                    .clone()
                    .unwrap_or_else(|| self.shell.name_prefix.clone()),
                vi_mode: raw.shell.vi_mode.unwrap_or(self.shell.vi_mode),
                timeout: raw
                    .shell
                    .timeout
                    .clone()
                    .unwrap_or_else(|| self.shell.timeout.clone()),
            },
        }
    }

    /// Apply environment variables as explicit overrides.
    ///
    /// Empty variables count as unset, so `KOI_CONTEXT=""` falls back to
    /// `KOI_CTX`.
    fn apply_env_overrides(mut self, env: Map<String, String>) -> Result<Self, ApplicationError> {
        let koi = Config::builder()
            .add_source(
                Environment::with_prefix("KOI")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .source(Some(env.clone())),
            )
            .build()
            .map_err(config_err)?;

        if let Some(context) = first_string(&koi, &["context", "ctx"]) {
            self.context = Some(context);
        }
        if let Some(namespace) = first_string(&koi, &["namespace", "ns"]) {
            self.namespace = Some(namespace);
        }
        if let Ok(val) = koi.get_string("kubectl_exe") {
            self.kubectl_exe = val;
        }
        if let Ok(val) = koi.get_string("log_level") {
            self.log_level = val;
        }
        if let Ok(val) = koi.get_string("shell.image") {
            self.shell.image = val;
        }
        if let Ok(val) = koi.get_string("shell.timeout") {
            self.shell.timeout = val;
        }

        let kshell = Config::builder()
            .add_source(
                Environment::with_prefix("KSHELL")
                    .ignore_empty(true)
                    .source(Some(env)),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = kshell.get_string("name") {
            self.shell.name = Some(val);
        }
        if let Ok(val) = kshell.get_bool("vi_mode") {
            self.shell.vi_mode = val;
        }
        Ok(self)
    }

    /// Expand `~` in the executable path.
    fn expand_paths(&mut self) {
        self.kubectl_exe = shellexpand::tilde(&self.kubectl_exe).into_owned();
    }

    /// Defaults handed to the argument rewriter.
    pub fn filter_environment(&self) -> FilterEnvironment {
        FilterEnvironment {
            context: self.context.clone(),
            namespace: self.namespace.clone(),
        }
    }

    /// Log verbosity, `None` when the level name is not recognised.
    pub fn log_level_filter(&self) -> Option<LevelFilter> {
        parse_log_level(&self.log_level)
    }
}

/// Accepts tracing level names plus the `warning`, `fatal` and `panic`
/// spellings, case-insensitively.
pub fn parse_log_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

fn first_string(config: &Config, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| config.get_string(key).ok())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
