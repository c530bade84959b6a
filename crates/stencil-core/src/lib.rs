//! Stencil Core
//!
//! Trivia-preserving renderer for text templates that alternate literal text
//! with `{{ ... }}` code regions. A syntax tree captured with its trivia
//! renders back to the exact source; a tree built in code renders to the
//! smallest text that parses back to the same tree.

pub mod config;
pub mod cst;
pub mod error;
pub mod result;

// Re-export commonly used types
pub use config::{ConfigLoader, RenderConfiguration, StencilConfiguration};
pub use cst::{
    ClosingKeyword, Node, RenderOptions, Renderer, RoundTripValidator, StringOutput, SyntaxNode,
    TextOutput, TriviaBundle, TriviaItem, TriviaKind, WriterOutput, render_to_string,
};
pub use error::{ErrorKind, StencilError};
pub use result::{Result, ResultExt};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stencil=info,stencil_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            // Rendered templates go to stdout; logs must not mix with them
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
