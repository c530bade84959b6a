//! CLI command implementations

use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use stencil_core::cst::{RenderOptions, Renderer, RoundTripValidator, StringOutput};
use stencil_core::{ConfigLoader, Node, Result, StencilConfiguration, StencilError};
use tracing::{debug, info, warn};

/// Render command implementation
pub fn render_command(
    tree_path: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    debug!("Rendering tree from {}", tree_path.display());

    let tree = load_tree(tree_path)?;
    let options = load_render_options(config_path, tree_path)?;

    // A failed render leaves partial text behind; nothing is written until it succeeds
    let mut sink = StringOutput::new();
    Renderer::new(&mut sink, options).render(&tree)?;
    let text = sink.into_string();

    match output {
        Some(path) => {
            fs::write(path, &text).map_err(|e| StencilError::io_error(path, e))?;
            info!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(StencilError::output)?;
        }
    }

    Ok(())
}

/// Check command implementation
///
/// Returns whether the tree rendered back to the source exactly.
pub fn check_command(
    tree_path: &Path,
    source_path: &Path,
    config_path: Option<&Path>,
) -> Result<bool> {
    let tree = load_tree(tree_path)?;
    let options = load_render_options(config_path, tree_path)?;
    let source =
        fs::read_to_string(source_path).map_err(|e| StencilError::io_error(source_path, e))?;

    let result = RoundTripValidator::with_options(options).validate_round_trip(&tree, &source)?;

    for issue in &result.delimiter_issues {
        warn!("Delimiter issue in rendered text: {}", issue);
        eprintln!("{} {}", "warning:".yellow().bold(), issue);
    }

    if result.is_valid() {
        println!(
            "{} {} renders back to {}",
            "✓".green(),
            tree_path.display(),
            source_path.display()
        );
        return Ok(true);
    }

    eprintln!(
        "{} {} does not render back to {}",
        "✗".red(),
        tree_path.display(),
        source_path.display()
    );
    for difference in &result.differences {
        eprintln!("  {}:{}", source_path.display(), difference);
    }
    Ok(false)
}

/// Schema command implementation
pub fn schema_command() -> Result<()> {
    let schema = StencilConfiguration::json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_tree(path: &Path) -> Result<Node> {
    let text = fs::read_to_string(path).map_err(|e| StencilError::io_error(path, e))?;
    Node::from_json(&text)
}

fn load_render_options(config_path: Option<&Path>, tree_path: &Path) -> Result<RenderOptions> {
    // Discovery starts next to the tree file
    let start_dir = tree_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let config = ConfigLoader::load(config_path, Some(start_dir))?;
    Ok(config.render_options())
}
