//! Configuration system for stencil
//!
//! Configuration only affects synthesized output: a tree that carries its
//! trivia renders the same whatever the settings.
//!
//! ## Configuration Files
//!
//! - `.stencilrc.json` / `.stencilrc.toml` - dotfile configs
//! - `stencil.yaml` / `stencil.yml` / `stencil.json`
//!
//! ## Configuration Discovery
//!
//! When no explicit config path is provided, the loader searches from the
//! current directory up the directory tree until a config is found or the
//! filesystem root is reached. Without a config file the defaults apply.
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "$schema": "./stencil.schema.json",
//!   "render": {
//!     "spacesAroundOperators": true,
//!     "spaceAfterComma": false
//!   }
//! }
//! ```

mod loader;
mod stencil_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use stencil_config::{RenderConfiguration, StencilConfiguration};
