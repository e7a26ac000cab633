//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/organigram/organigram.toml`
//! 3. Local config: `--config <file>` or `./.organigram.toml`
//! 4. Environment variables: `ORGANIGRAM_*` prefix, `__` between section and key
//!    (e.g. `ORGANIGRAM_SERVER__PORT=9000`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{HierarchyOptions, LayoutOptions, RootFallback, DEFAULT_ROOT_LABEL};

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".organigram.toml";

/// Input file location and column layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// CSV file used when no path is given on the command line
    pub path: PathBuf,
    /// Single-byte field delimiter
    pub delimiter: String,
    pub first_name_column: String,
    pub last_name_column: String,
    pub supervisor_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("organigramm.csv"),
            delimiter: ";".into(),
            first_name_column: "Vorname".into(),
            last_name_column: "Name".into(),
            supervisor_column: "Vorgesetzter".into(),
        }
    }
}

/// Root resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Label of the synthetic root joining several top-level people
    pub root_label: String,
    /// Add the synthetic root even above a lone listed top-level person
    pub always_synthesize_root: bool,
    /// Policy when no top-level person exists: "first-sorted" or "reject"
    pub fallback: RootFallback,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.into(),
            always_synthesize_root: false,
            fallback: RootFallback::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub level_height: f64,
    pub force_iterations: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let defaults = LayoutOptions::default();
        Self {
            level_height: defaults.level_height,
            force_iterations: defaults.force_iterations,
        }
    }
}

/// Output appearance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Page and diagram heading
    pub title: String,
    /// Title inside the sunburst chart
    pub chart_title: String,
    /// Script URL for the chart library
    pub plotly_url: String,
    /// Dendrogram output file
    pub output: PathBuf,
    pub svg_width: u32,
    pub svg_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "Organigramm".into(),
            chart_title: "Organizational Hierarchy".into(),
            plotly_url: "https://cdn.plot.ly/plotly-2.35.2.min.js".into(),
            output: PathBuf::from("organigramm.svg"),
            svg_width: 1800,
            svg_height: 1200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8050,
        }
    }
}

/// Unified configuration for organigram.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub input: InputConfig,
    pub hierarchy: HierarchyConfig,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub server: ServerConfig,
}

/// Get the XDG config directory for organigram.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "organigram").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("organigram.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit config file; must exist. Without it,
    ///   `./.organigram.toml` is used if present.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Config::try_from(&Self::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(global_path) = global_config_path() {
            builder = builder.add_source(File::from(global_path).required(false));
        }

        builder = match local {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                builder.add_source(File::from(path.to_path_buf()).required(true))
            }
            None => builder.add_source(File::from(PathBuf::from(LOCAL_CONFIG_FILE)).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("ORGANIGRAM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.input.path = expand_path(&self.input.path);
        self.render.output = expand_path(&self.render.output);
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        self.delimiter()?;
        if self.hierarchy.root_label.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "hierarchy.root_label must not be empty".into(),
            });
        }
        if !(self.layout.level_height > 0.0) {
            return Err(ApplicationError::Config {
                message: format!(
                    "layout.level_height must be positive, got {}",
                    self.layout.level_height
                ),
            });
        }
        Ok(())
    }

    /// Field delimiter as the single byte the CSV reader needs.
    pub fn delimiter(&self) -> Result<u8, ApplicationError> {
        match self.input.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(ApplicationError::Config {
                message: format!(
                    "input.delimiter must be a single byte, got {:?}",
                    self.input.delimiter
                ),
            }),
        }
    }

    pub fn hierarchy_options(&self) -> HierarchyOptions {
        HierarchyOptions {
            root_label: self.hierarchy.root_label.clone(),
            always_synthesize_root: self.hierarchy.always_synthesize_root,
            fallback: self.hierarchy.fallback,
        }
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            level_height: self.layout.level_height,
            force_iterations: self.layout.force_iterations,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# organigram configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/organigram/organigram.toml
#   Local:  ./.organigram.toml or --config <file>
#   Env:    ORGANIGRAM_<SECTION>__<KEY>, e.g. ORGANIGRAM_SERVER__PORT=9000

[input]
# path = "organigramm.csv"
# delimiter = ";"
# first_name_column = "Vorname"
# last_name_column = "Name"
# supervisor_column = "Vorgesetzter"

[hierarchy]
# Label of the synthetic root when several people are top level
# root_label = "Schalke 04"
# always_synthesize_root = false
# No top-level person at all: "first-sorted" or "reject"
# fallback = "first-sorted"

[layout]
# level_height = 2.0
# force_iterations = 300

[render]
# title = "Organigramm"
# chart_title = "Organizational Hierarchy"
# output = "organigramm.svg"
# svg_width = 1800
# svg_height = 1200

[server]
# host = "0.0.0.0"
# port = 8050
"#
        .to_string()
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
