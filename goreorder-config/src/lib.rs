//! Layered configuration for goreorder.
//!
//! `defaults/goreorder.default.toml` is embedded into the binary. [`Loader`] stacks the project
//! file, the environment and command-line overrides on top of it before deserializing into
//! [`GoreorderConfig`].

use config::builder::DefaultState;
use config::{Case, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map, ValueKind};
use goreorder::Order;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/goreorder.default.toml");

/// Name of the per-project configuration file
pub const PROJECT_FILE: &str = ".goreorder";

/// Prefix of the environment variables read by [`Loader::with_env`]
pub const ENV_PREFIX: &str = "GOREORDER";

/// Effective goreorder settings. Keys are kebab-case, as in existing `.goreorder` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GoreorderConfig {
    /// `builtin` or a formatter executable
    pub format: String,
    /// `diff` or `builtin`
    pub diff_tool: String,
    pub write: bool,
    pub verbose: bool,
    pub reorder_types: bool,
    pub diff: bool,
    /// Requested categories; empty means the default order
    pub order: Vec<Order>,
}

impl GoreorderConfig {
    /// The requested order, or `None` when the default applies
    pub fn requested_order(&self) -> Option<Vec<Order>> {
        if self.order.is_empty() {
            None
        } else {
            Some(self.order.clone())
        }
    }

    /// The same settings with an empty order spelled out as the default order
    pub fn with_effective_order(mut self) -> Self {
        if self.order.is_empty() {
            self.order = Order::DEFAULT.to_vec();
        }
        self
    }

    /// Render the configuration as a `.goreorder` file
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Helper for layering overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    ///
    /// `.toml` and `.json` files are read as such, anything else as YAML.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let source = File::from(path).format(file_format(path)).required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let source = File::from(path).format(file_format(path)).required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer the `.goreorder` file of `dir`, if there is one.
    pub fn with_project_file(self, dir: impl AsRef<Path>) -> Self {
        self.with_optional_file(project_file(dir))
    }

    /// Layer `GOREORDER_*` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_vars(None)
    }

    /// Layer `GOREORDER_*` variables taken from `vars` instead of the process environment.
    ///
    /// `GOREORDER_REORDER_TYPES` sets `reorder-types`.
    pub fn with_env_vars(mut self, vars: Option<Map<String, String>>) -> Self {
        let source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .convert_case(Case::Kebab)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("order")
            .source(vars);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GoreorderConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Path of the `.goreorder` file in `dir`
pub fn project_file(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(PROJECT_FILE)
}

fn file_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => FileFormat::Toml,
        Some("json") => FileFormat::Json,
        _ => FileFormat::Yaml,
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GoreorderConfig, ConfigError> {
    Loader::new().build()
}
