use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ann_probe::cli::parse_args;
use ann_probe::prompt::build_prompts;
use ann_probe::report::{load_profile, write_json};

/// Turns a pickled profile matrix into one explanation prompt per neuron.
#[derive(Parser, Debug)]
#[command(name = "generate-prompts")]
struct Cli {
    /// Text placed before every neuron description
    prompt_header_file: PathBuf,

    /// Pickled profile matrix written by record-activations
    activations_file: PathBuf,

    /// JSON array of prompts
    output_file: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli: Cli = parse_args();
    ann_probe::log::init(cli.verbose);

    let header = std::fs::read_to_string(&cli.prompt_header_file)
        .with_context(|| format!("reading prompt header {}", cli.prompt_header_file.display()))?;
    let profile = load_profile(&cli.activations_file)
        .with_context(|| format!("loading profile {}", cli.activations_file.display()))?;
    info!(
        neurons = profile.neuron_count(),
        features = profile.feature_count(),
        "profile loaded"
    );

    let prompts = build_prompts(&header, &profile)?;
    write_json(&prompts, &cli.output_file)
        .with_context(|| format!("writing {}", cli.output_file.display()))?;
    info!(count = prompts.len(), path = %cli.output_file.display(), "prompts written");
    Ok(())
}
