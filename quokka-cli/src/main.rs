//! Quokka CLI
//!
//! Reads an HTML document, rewrites every relative reference to an absolute
//! URL against the given base, and writes the result back out. The rewrite
//! itself cannot fail; every error here is I/O.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use quokka_rewrite::rewrite;

/// Rewrite relative URLs in extracted HTML to absolute ones.
#[derive(Debug, Parser)]
#[command(name = "quokka")]
#[command(about = "Rewrite relative URLs in extracted HTML to absolute ones", long_about = None)]
struct Cli {
    /// Base URL the document was extracted from.
    #[arg(long)]
    base: String,

    /// Input HTML file; reads stdin when absent or `-`.
    input: Option<PathBuf>,

    /// Output file; writes stdout when absent.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a one-line summary to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let html = match &cli.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            let _ = io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read stdin")?;
            buffer
        }
    };

    let rewritten = rewrite(&cli.base, &html);

    match &cli.output {
        Some(path) => fs::write(path, &rewritten)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => io::stdout()
            .write_all(rewritten.as_bytes())
            .context("cannot write stdout")?,
    }

    if cli.verbose {
        eprintln!(
            "{} {} bytes in, {} bytes out",
            "rewritten".green().bold(),
            html.len(),
            rewritten.len()
        );
    }

    Ok(())
}
