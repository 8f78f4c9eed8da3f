//! The `wiregen` command-line tool.
//!
//! ```text
//! wiregen <IR.json> [--output DIR] [--server] [--debug]
//! ```

use clap::Parser;
use wiregen::cli::{Args, init_tracing, run};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);
    run(&args)
}
