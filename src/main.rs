use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use animal_grouper::random::{create_rng, entropy_rng};
use animal_grouper::{
    AnimalGrouper, Dataset, GroupingConfig, GroupingError, GroupingOutcome, RetryPolicy,
    MAX_RETRIES,
};

#[derive(Parser, Debug)]
#[command(
    name = "animal-grouper",
    version,
    about = "Split weighed animals into groups with balanced weight dispersion"
)]
struct Cli {
    /// JSON array of rows, each with a "Weight" and optionally a "Sex" ("F"/"M") field.
    #[arg(long, short)]
    input: PathBuf,

    /// Number of groups to form.
    #[arg(long, short = 'g')]
    groups: usize,

    /// Multiplier on the herd's weight dispersion that no group may exceed.
    #[arg(long, short = 't', default_value_t = 1.0)]
    threshold: f64,

    /// Balance females and males separately before merging them.
    #[arg(long, default_value_t = false)]
    by_sex: bool,

    /// Candidates each search may try before giving up.
    #[arg(long, default_value_t = MAX_RETRIES)]
    max_attempts: usize,

    /// Seed for a reproducible grouping; drawn from the OS when absent.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    config: &'a GroupingConfig,
    seed: Option<u64>,
    #[serde(flatten)]
    outcome: &'a GroupingOutcome,
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "grouping failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        eprintln!("{}", operator_hint(&err));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let dataset = Dataset::from_json_str(&raw)
        .with_context(|| format!("failed to parse {} as a JSON array of rows", cli.input.display()))?;

    let config = GroupingConfig::new(cli.groups, cli.threshold, cli.by_sex)?.with_retry(RetryPolicy {
        max_attempts: cli.max_attempts,
    });
    let grouper = AnimalGrouper::new(config);

    let outcome = match cli.seed {
        Some(seed) => grouper.group(&dataset, &mut create_rng(seed))?,
        None => grouper.group(&dataset, &mut entropy_rng())?,
    };

    match cli.format {
        OutputFormat::Json => {
            let report = Report {
                config: grouper.config(),
                seed: cli.seed,
                outcome: &outcome,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_text(&outcome),
    }
    Ok(())
}

fn print_text(outcome: &GroupingOutcome) {
    if let Some(female) = &outcome.output_female {
        println!("Female groups:\n{female}");
    }
    if let Some(male) = &outcome.output_male {
        println!("Male groups:\n{male}");
    }
    println!("Groups:\n{}", outcome.output);
}

fn operator_hint(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<GroupingError>() {
        Some(GroupingError::Schema { .. } | GroupingError::InvalidWeight { .. }) => {
            "Please make sure you upload the correct format file."
        }
        Some(GroupingError::RetryExhausted { .. }) => {
            "The deviation of the data is too big. Maybe adjust the threshold value."
        }
        Some(GroupingError::InvalidConfig(_) | GroupingError::InsufficientSamples { .. }) => {
            "Please check the number of groups and the threshold."
        }
        _ if err.downcast_ref::<serde_json::Error>().is_some() => {
            "Please make sure you upload the correct format file."
        }
        _ => "Something unexpected happened while grouping.",
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
