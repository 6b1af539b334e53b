//! Layered configuration.
//!
//! Defaults, then the global file, then the project file, then
//! `BIFROST_*` environment variables. See [`ConfigLoader`].
//!
//! ```toml
//! debug = false
//!
//! [engine]
//! entrypoint = "main"
//! cache_key = "io.flutter.bifrost"
//!
//! [coordinator]
//! buffer_depth = 2
//! can_pop_timeout_ms = 3000
//!
//! [page]
//! default_background = 4294967295  # 0xFFFFFFFF, opaque white
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{BifrostConfig, CoordinatorConfig, EngineConfig, PageConfig};

use std::path::PathBuf;

/// Directory holding project-level configuration.
pub const PROJECT_CONFIG_DIR: &str = ".bifrost";

/// Config file name, shared by the global and project layers.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";

/// Returns the global config path (`~/.bifrost/config.toml`).
///
/// Falls back to a relative `.bifrost/config.toml` when no home
/// directory can be determined.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROJECT_CONFIG_DIR)
        .join(PROJECT_CONFIG_FILE)
}
