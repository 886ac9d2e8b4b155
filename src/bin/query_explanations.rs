use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ann_probe::cli::parse_args;
use ann_probe::explain::{OpenAiClient, explain_all};
use ann_probe::report::{read_json, write_json};

/// Sends every prompt to a chat model and stores the answers in prompt order.
/// Needs OPENAI_API_KEY and OPENAI_ORG; OPENAI_BASE_URL overrides the endpoint.
#[derive(Parser, Debug)]
#[command(name = "query-explanations")]
struct Cli {
    model: String,

    /// JSON array of prompts written by generate-prompts
    prompt_file: PathBuf,

    /// JSON array of explanations
    output_file: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli: Cli = parse_args();
    ann_probe::log::init(cli.verbose);

    let prompts: Vec<String> =
        read_json(&cli.prompt_file).with_context(|| format!("reading prompts {}", cli.prompt_file.display()))?;
    info!(count = prompts.len(), model = %cli.model, "querying explanations");

    let client = OpenAiClient::new();
    let explanations = explain_all(&client, &cli.model, &prompts)?;
    write_json(&explanations, &cli.output_file)
        .with_context(|| format!("writing {}", cli.output_file.display()))?;
    Ok(())
}
