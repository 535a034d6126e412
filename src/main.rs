//! injury-risk - command line entry point
//!
//! `predict` runs one invocation through the same handler a scheduled
//! trigger would use; `diagnose` and `explore` inspect a SQLite snapshot.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use injury_risk_core::api::{InvocationContext, InvocationHandler};
use injury_risk_core::config::{FeatureSourceKind, PipelineConfig, ScorerKind, StoreConfig};
use injury_risk_core::constants::{APP_NAME, APP_VERSION};
use injury_risk_core::logic::diagnostics::{DatasetValidator, PlayerDataExplorer};
use injury_risk_core::logic::features::layout::LayoutInfo;
use injury_risk_core::logic::features::StaticSource;

#[derive(Parser, Debug)]
#[command(name = "injury-risk")]
#[command(about = "Batch injury-risk scoring and dataset diagnostics")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "INJURY_RISK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score the roster and publish predictions
    Predict {
        /// Feature source: synthetic or static
        #[arg(long)]
        source: Option<FeatureSourceKind>,

        /// Scorer: model or heuristic
        #[arg(long)]
        scorer: Option<ScorerKind>,

        /// Seed for synthetic features
        #[arg(long)]
        seed: Option<u64>,

        /// Local store root (overrides the configured backend)
        #[arg(long)]
        store_root: Option<PathBuf>,

        /// Roster JSON for synthetic features
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Trigger event as JSON
        #[arg(long, default_value = "{}")]
        event: String,
    },

    /// Validate a statistics snapshot and print a viability verdict
    Diagnose {
        database: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Look for player-level game statistics in a snapshot
    Explore {
        database: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Print the canonical feature layout and static value ranges
    Features {
        #[arg(long)]
        json: bool,
    },
}

fn predict(
    mut config: PipelineConfig,
    source: Option<FeatureSourceKind>,
    scorer: Option<ScorerKind>,
    seed: Option<u64>,
    store_root: Option<PathBuf>,
    roster: Option<PathBuf>,
    event: &str,
) -> Result<()> {
    if let Some(source) = source {
        config.feature_source = source;
    }
    if let Some(scorer) = scorer {
        config.scorer = scorer;
    }
    if let Some(seed) = seed {
        config.random_seed = seed;
    }
    if let Some(root) = store_root {
        config.store = StoreConfig::Local { root: Some(root) };
    }
    if roster.is_some() {
        config.roster_path = roster;
    }
    config.validate()?;

    let event: serde_json::Value = serde_json::from_str(event).context("--event is not valid JSON")?;
    let handler = InvocationHandler::from_config(config);
    log::info!("Using store {}", handler.store().describe());

    let response = handler.handle(&event, &InvocationContext::default());
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        bail!("prediction failed (status {})", response.status_code);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    match cli.command {
        Command::Predict {
            source,
            scorer,
            seed,
            store_root,
            roster,
            event,
        } => {
            let config = PipelineConfig::load(cli.config.as_deref()).context("loading configuration")?;
            predict(config, source, scorer, seed, store_root, roster, &event)?;
        }

        Command::Diagnose { database, json } => {
            let report = DatasetValidator::open(&database)
                .and_then(|v| v.validate())
                .with_context(|| format!("validating {}", database.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }

        Command::Explore { database, json } => {
            let report = PlayerDataExplorer::open(&database)
                .and_then(|e| e.explore())
                .with_context(|| format!("exploring {}", database.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }

        Command::Features { json } => {
            let layout = LayoutInfo::current();
            let ranges = StaticSource::new().feature_ranges();
            if json {
                let doc = serde_json::json!({ "layout": layout, "static_ranges": ranges });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!(
                    "Feature layout v{} ({} features, hash {:08x})",
                    layout.version, layout.feature_count, layout.hash
                );
                println!("{:<4} {:<24} {:>10} {:>10} {:>10}", "#", "feature", "min", "max", "mean");
                for (i, r) in ranges.iter().enumerate() {
                    println!(
                        "{:<4} {:<24} {:>10.3} {:>10.3} {:>10.3}",
                        i, r.feature, r.min, r.max, r.mean
                    );
                }
            }
        }
    }

    Ok(())
}
