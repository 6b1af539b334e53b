//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.bifrost/config.toml`)
//! 3. Project config (`.bifrost/config.toml`)
//! 4. Environment variables (`BIFROST_*`)
//!
//! Each layer overrides the previous. The merged result is validated
//! before it is returned.

use super::{default_config_path, BifrostConfig, ConfigError, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use bifrost_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/app")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), bifrost_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.bifrost/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.bifrost/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read
    /// or parsed, an environment variable is malformed, or the merged
    /// values fail validation. Missing config files are ignored.
    pub fn load(&self) -> Result<BifrostConfig, ConfigError> {
        let mut config = BifrostConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_config) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global_config);
            }
        }

        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_config) = load_file(&path)? {
                    debug!(path = %path.display(), "Loaded project config");
                    config.merge(&project_config);
                }
            }
        }

        if !self.skip_env {
            apply_env(&mut config, |name| std::env::var(name).ok())?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Loads a config file, returning None if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<BifrostConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let config =
        BifrostConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(config))
}

/// Applies `BIFROST_*` overrides read through `lookup`.
fn apply_env(
    config: &mut BifrostConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(val) = lookup("BIFROST_DEBUG") {
        config.debug = parse_bool(&val)
            .ok_or_else(|| ConfigError::invalid_env_var("BIFROST_DEBUG", "expected bool"))?;
    }

    if let Some(val) = lookup("BIFROST_ENTRYPOINT") {
        config.engine.entrypoint = val;
    }

    if let Some(val) = lookup("BIFROST_CAN_POP_TIMEOUT_MS") {
        config.coordinator.can_pop_timeout_ms = val.trim().parse().map_err(|_| {
            ConfigError::invalid_env_var("BIFROST_CAN_POP_TIMEOUT_MS", "expected milliseconds")
        })?;
    }

    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bifrost_types::{Color, ErrorCode};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn load_defaults_only() {
        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, BifrostConfig::default());
    }

    #[test]
    fn load_project_overrides_global() {
        let global_temp = TempDir::new().unwrap();
        let project_temp = TempDir::new().unwrap();

        let bifrost_dir = project_temp.path().join(".bifrost");
        std::fs::create_dir_all(&bifrost_dir).unwrap();

        let global_path = create_config_file(
            global_temp.path(),
            r#"
debug = true

[engine]
entrypoint = "globalMain"
"#,
        );

        create_config_file(
            &bifrost_dir,
            r#"
[engine]
entrypoint = "projectMain"

[page]
default_background = 4278190080
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        assert!(config.debug);
        assert_eq!(config.engine.entrypoint, "projectMain");
        assert_eq!(config.page.default_background, Color::BLACK);
    }

    #[test]
    fn missing_config_files_ok() {
        let config = ConfigLoader::new()
            .with_global_config("/nonexistent/path/config.toml")
            .with_project_root("/nonexistent/project")
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, BifrostConfig::default());
    }

    #[test]
    fn malformed_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(temp.path(), "debug = [");

        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();

        assert_eq!(err.code(), "CONFIG_PARSE_TOML");
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(
            temp.path(),
            "[coordinator]\ncan_pop_timeout_ms = 0\n",
        );

        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();

        assert_eq!(err.code(), "CONFIG_INVALID_VALUE");
    }

    #[test]
    fn env_overrides() {
        let mut config = BifrostConfig::default();
        apply_env(
            &mut config,
            env(&[
                ("BIFROST_DEBUG", "yes"),
                ("BIFROST_ENTRYPOINT", "embedMain"),
                ("BIFROST_CAN_POP_TIMEOUT_MS", "150"),
            ]),
        )
        .unwrap();

        assert!(config.debug);
        assert_eq!(config.engine.entrypoint, "embedMain");
        assert_eq!(config.coordinator.can_pop_timeout_ms, 150);
    }

    #[test]
    fn env_rejects_malformed_values() {
        let mut config = BifrostConfig::default();
        let err = apply_env(&mut config, env(&[("BIFROST_DEBUG", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("BIFROST_DEBUG"));

        let err = apply_env(&mut config, env(&[("BIFROST_CAN_POP_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID_ENV_VAR");
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("invalid"), None);
    }
}
