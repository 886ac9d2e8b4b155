use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ann_probe::cli::parse_args;
use ann_probe::weights::PopulationSummary;

const PREVIEW: usize = 10;

/// Prints the layout and score spread of an evolved population file.
#[derive(Parser, Debug)]
#[command(name = "inspect-population")]
struct Cli {
    population_csv: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli: Cli = parse_args();
    ann_probe::log::init(cli.verbose);

    let summary = PopulationSummary::from_path(&cli.population_csv)
        .with_context(|| format!("reading population {}", cli.population_csv.display()))?;
    let first = &summary.first;
    let weights = &summary.first_weights.weights;

    println!("CSV format: id, avg_score, pstdev, best_score, encoded_weights");
    println!(
        "First row values: {}, {}, {}, {}",
        first.id, first.avg_score, first.pstdev, first.best_score
    );
    println!("Num features: {}", summary.first_weights.feature_count);
    println!("Num hidden: {}", summary.first_weights.hidden_count);
    println!("Weights len: {}", weights.len());
    println!("First {PREVIEW} weights: {:?}", &weights[..weights.len().min(PREVIEW)]);
    println!("Last {PREVIEW} weights: {:?}", &weights[weights.len().saturating_sub(PREVIEW)..]);
    println!("Total individuals in population: {}", summary.size);
    println!("Best performer index: {}", summary.best_index);
    println!("Best score: {}", summary.best_avg_score);
    println!("Score range: {} to {}", summary.avg_scores.min, summary.avg_scores.max);
    println!("Mean score: {:.4}", summary.avg_scores.mean);
    Ok(())
}
