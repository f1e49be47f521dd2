use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mipsasm::asm;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble a reduced-MIPS source file into machine words"
)]
struct Opts {
    /// Assembly source file
    #[arg(value_name = "ASMFILE")]
    input: String,

    /// Listing output path
    #[arg(short, long, default_value = "output_listing.txt")]
    listing: String,

    /// Instruction word output path
    #[arg(short = 'o', long, default_value = "output_instructions.txt")]
    instructions: String,

    /// Also write the raw little-endian machine-code image here
    #[arg(short, long)]
    binary: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let source = fs::read_to_string(&opts.input)
        .with_context(|| format!("failed to read {}", opts.input))?;

    // Assemble fully before touching any output file; a fatal error leaves
    // no partial listing behind.
    let assembly = asm::assemble(&source)?;

    fs::write(&opts.listing, assembly.render_listing())
        .with_context(|| format!("failed to write {}", opts.listing))?;
    fs::write(&opts.instructions, assembly.render_words())
        .with_context(|| format!("failed to write {}", opts.instructions))?;

    if let Some(path) = &opts.binary {
        fs::write(path, assembly.to_le_bytes())
            .with_context(|| format!("failed to write {}", path))?;
    }

    Ok(())
}
