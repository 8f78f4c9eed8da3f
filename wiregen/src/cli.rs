//! Command-line interface of the `wiregen` binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wiregen_codegen::{GeneratorConfig, generate_to_dir};

/// Generate typed Rust wire models from a wiregen IR document.
#[derive(Debug, Parser)]
#[command(name = "wiregen", version, about)]
pub struct Args {
    /// Path to the IR document (`*.json`).
    pub input: PathBuf,

    /// Directory the generated module tree is written to.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Also emit the server integration hooks on errors.
    #[arg(long)]
    pub server: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Returns the generator configuration selected by the flags.
    #[must_use]
    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new().server_extras(self.server)
    }

    /// Returns the default log filter when `RUST_LOG` is not set.
    #[must_use]
    pub const fn default_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

/// Installs the stderr log subscriber.
pub fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one generation.
///
/// # Errors
/// Returns the generation error with the input and output paths as context.
pub fn run(args: &Args) -> Result<()> {
    let written = generate_to_dir(&args.input, &args.output, &args.config()).with_context(|| {
        format!(
            "failed to generate code from '{}' into '{}'",
            args.input.display(),
            args.output.display()
        )
    })?;
    info!(
        "Generated {} files under {}",
        written.len(),
        args.output.display()
    );
    Ok(())
}
