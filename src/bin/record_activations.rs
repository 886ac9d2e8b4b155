use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;

use ann_probe::aggregate::AggregationPolicy;
use ann_probe::cli::parse_args;
use ann_probe::game::{DEFAULT_TURNS, Strategy};
use ann_probe::session::{OutputPaths, RecordingSession};
use ann_probe::strategies::{basic_strategies, find_strategy};
use ann_probe::weights::{WeightCatalog, WeightSource};

const ALL_OPPONENTS: &str = "all";

/// Records the hidden activations of a network over matches and writes its
/// neuron profile and correlation map. Run without arguments to list opponents.
#[derive(Parser, Debug)]
#[command(name = "record-activations")]
struct Cli {
    /// Population CSV, or a catalog entry when --catalog is given
    network: Option<String>,

    /// Opponent name with underscores for spaces, or `all`
    opponent: Option<String>,

    /// Weight catalog CSV (`name, num_features, num_hidden, weights...`)
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_TURNS)]
    turns: usize,

    /// weighted | max
    #[arg(long, default_value_t = AggregationPolicy::WeightedAverage)]
    policy: AggregationPolicy,

    #[arg(long, default_value = "visuals")]
    visuals_dir: PathBuf,

    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli: Cli = parse_args();
    ann_probe::log::init(cli.verbose);

    let Some(network) = cli.network else {
        for s in basic_strategies() {
            println!("{}", s.name());
        }
        return Ok(());
    };
    let Some(opponent) = cli.opponent else {
        eprintln!("usage: record-activations <NETWORK> <OPPONENT>");
        exit(1);
    };

    let source = match cli.catalog {
        Some(path) => WeightSource::Catalog {
            catalog: WeightCatalog::from_path(&path)
                .with_context(|| format!("reading weight catalog {}", path.display()))?,
            name: network,
        },
        None => WeightSource::Population {
            path: PathBuf::from(network),
        },
    };
    let weights = source
        .load()
        .with_context(|| format!("loading weights for {}", source.label()))?;
    let hidden = weights.hidden_count;

    let opponents: Vec<Box<dyn Strategy>> = if opponent == ALL_OPPONENTS {
        basic_strategies()
    } else {
        match find_strategy(&opponent.replace('_', " ")) {
            Ok(s) => vec![s],
            Err(_) => {
                println!("no player with name '{opponent}' found");
                exit(1);
            }
        }
    };

    let session = RecordingSession {
        label: source.label(),
        weights,
        turns: cli.turns,
        policy: cli.policy,
    };
    let output = session.run(opponents, |result| {
        println!("Playing against {}", result.players.0);
        println!("{}", result.sparklines());
        match result.winner() {
            Some(name) => println!("Winner: {name}"),
            None => println!("Winner: none (tie)"),
        }
    })?;

    for dir in [&cli.visuals_dir, &cli.data_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let paths = OutputPaths::new(&cli.visuals_dir, &cli.data_dir, hidden, &opponent, cli.policy);
    paths.write(&output).context("writing run artifacts")?;
    println!("Heat map: {}", paths.heat_map.display());
    println!("Profile: {}", paths.profile.display());
    Ok(())
}
