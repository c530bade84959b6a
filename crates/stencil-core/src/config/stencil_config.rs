//! Configuration types for stencil
//!
//! ## Example Configuration (stencil.yaml)
//!
//! ```yaml
//! render:
//!   spacesAroundOperators: false
//!   spaceAfterComma: true
//! ```

use crate::cst::RenderOptions;
use crate::{Result, StencilError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StencilConfiguration {
    /// JSON Schema reference, ignored when loading
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Rendering preferences for synthesized output
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Rendering preferences for synthesized output")]
    pub render: Option<RenderConfiguration>,
}

/// Cosmetic choices applied where the tree carries no trivia
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfiguration {
    #[schemars(description = "Put spaces around binary operators (default: true)")]
    pub spaces_around_operators: Option<bool>,

    #[schemars(description = "Put a space after synthesized commas (default: true)")]
    pub space_after_comma: Option<bool>,
}

impl StencilConfiguration {
    /// Load configuration from file
    ///
    /// The format follows the extension: `.json`, `.toml`, `.yaml` or `.yml`.
    /// Dotfiles such as `.stencilrc.json` are handled the same way.
    ///
    /// ```no_run
    /// use stencil_core::config::StencilConfiguration;
    /// use std::path::Path;
    ///
    /// let config = StencilConfiguration::load(Path::new("stencil.yaml"))?;
    /// # Ok::<(), stencil_core::StencilError>(())
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| StencilError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| StencilError::config_error(format!("Invalid YAML: {e}"))),
            Some("toml") => toml::from_str(&content)
                .map_err(|e| StencilError::config_error(format!("Invalid TOML: {e}"))),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| StencilError::config_error(format!("Invalid JSON: {e}"))),
            _ => Err(StencilError::config_error(
                "Unsupported file extension (expected .json, .toml, .yaml, or .yml)",
            )),
        }
    }

    /// Get render configuration with defaults
    pub fn render_config(&self) -> RenderConfiguration {
        self.render.clone().unwrap_or_default()
    }

    /// Options handed to the renderer
    pub fn render_options(&self) -> RenderOptions {
        self.render_config().into()
    }

    /// JSON Schema describing the configuration file
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(StencilConfiguration);
        serde_json::to_value(schema).unwrap_or_default()
    }
}

impl From<RenderConfiguration> for RenderOptions {
    fn from(config: RenderConfiguration) -> Self {
        let defaults = RenderOptions::default();
        RenderOptions {
            spaces_around_operators: config
                .spaces_around_operators
                .unwrap_or(defaults.spaces_around_operators),
            space_after_comma: config
                .space_after_comma
                .unwrap_or(defaults.space_after_comma),
        }
    }
}
