use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, debug, info, warn};

use uf2_formats::{family_name, merge, parse_blocks};
use uf2_merge::io::{read_input, validate_inputs, write_output};

#[derive(Parser)]
#[command(
    name = "uf2merge",
    about = "Combine multiple UF2 files into a single UF2 file",
    version,
    long_about = "Combines multiple UF2 firmware files, typically targeting different chip \
families or flash regions, into one file. Per-family block sequencing is rewritten so the \
output is a valid UF2 image for every family it contains. Partition tables and other \
extended UF2 features are not supported."
)]
struct Cli {
    /// Input UF2 files to combine
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output UF2 file path
    #[arg(short, long)]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs on stderr, keeping stdout for the final summary line.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    validate_inputs(&cli.inputs)?;

    let mut buffers = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let data = read_input(path)?;
        debug!("read {} ({} bytes)", path.display(), data.len());

        let malformed = parse_blocks(&data)
            .iter()
            .filter(|block| block.validate().is_err())
            .count();
        if malformed > 0 {
            warn!(
                "{}: {malformed} blocks have malformed structure, merging anyway",
                path.display()
            );
        }

        buffers.push(data);
    }

    let combined = merge(&buffers);
    log_family_summary(&combined);

    write_output(&cli.output, &combined)?;
    info!(
        "wrote {} bytes to {}",
        combined.len(),
        cli.output.display()
    );
    println!(
        "Combined {} UF2 files into {}",
        cli.inputs.len(),
        cli.output.display()
    );

    Ok(())
}

/// Log a per-family block count breakdown of the merged output.
fn log_family_summary(combined: &[u8]) {
    let mut order = Vec::new();
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for block in parse_blocks(combined) {
        let family = block.family_id();
        if !counts.contains_key(&family) {
            order.push(family);
        }
        *counts.entry(family).or_insert(0) += 1;
    }

    for family in order {
        let count = counts.get(&family).copied().unwrap_or(0);
        match family_name(family) {
            Some(name) => debug!("family {family:#010x} ({name}): {count} blocks"),
            None => debug!("family {family:#010x}: {count} blocks"),
        }
    }
}
