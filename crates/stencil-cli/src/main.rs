//! Stencil CLI
//!
//! Command-line interface for rendering Stencil template syntax trees

mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use stencil_core::{Result, init_tracing};
use tracing::error;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "Stencil: trivia-preserving renderer for template syntax trees")]
#[command(version = stencil_core::VERSION)]
#[command(
    long_about = "Stencil renders template syntax trees (stored as JSON) back to template text.\n\
Trees that carry their trivia print their exact source; trees built in code print\n\
the smallest text that parses back to them.\n\
\n\
Examples:\n  \
stencil render tree.json             # Print the template\n  \
stencil render tree.json -o out.txt  # Write the template to a file\n  \
stencil check tree.json --source page.html  # Verify a round trip\n  \
stencil schema                       # Print the configuration JSON Schema"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.stencilrc.json/.stencilrc.toml/stencil.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a syntax tree to template text
    Render {
        /// JSON file holding the tree
        #[arg(help = "Path to the syntax tree (JSON)")]
        tree: PathBuf,

        /// Write the template here instead of stdout
        #[arg(short, long, help = "Output file (default: stdout)")]
        output: Option<PathBuf>,
    },

    /// Check that a captured tree renders back to its source exactly
    Check {
        /// JSON file holding the tree
        #[arg(help = "Path to the syntax tree (JSON)")]
        tree: PathBuf,

        /// Template the tree was captured from
        #[arg(short, long, help = "Path to the original template")]
        source: PathBuf,
    },

    /// Print the JSON Schema of the configuration file
    Schema,

    /// Show version information
    Version {
        /// Show detailed version information
        #[arg(long, help = "Show detailed build information")]
        detailed: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return Ok(());
    }

    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "stencil=error,stencil_core=error",
        1 => "stencil=warn,stencil_core=warn",
        2 => "stencil=info,stencil_core=info",
        3 => "stencil=debug,stencil_core=debug",
        _ => "stencil=trace,stencil_core=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    match run_command(cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("stencil failed: {}", e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Render { tree, output }) => {
            commands::render_command(&tree, output.as_deref(), cli.config.as_deref())
        }

        Some(Commands::Check { tree, source }) => {
            let matched = commands::check_command(&tree, &source, cli.config.as_deref())?;
            if !matched {
                std::process::exit(1);
            }
            Ok(())
        }

        Some(Commands::Schema) => commands::schema_command(),

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("stencil {}", stencil_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
            } else {
                println!("{}", stencil_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
