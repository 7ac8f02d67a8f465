mod inspect;
mod run;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use painscout_pipeline::RunMode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "painscout")]
#[command(about = "Pain-signal lead qualification pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline over a batch of organizations
    Run {
        /// full, analysis-only or campaign-only
        #[arg(long, default_value = "full")]
        mode: RunMode,

        /// Organizations roster (defaults to PAINSCOUT_ORGANIZATIONS_PATH)
        #[arg(long)]
        organizations: Option<PathBuf>,

        /// Reports from an earlier run; required for campaign-only
        #[arg(long)]
        prior_reports: Option<PathBuf>,

        /// Write per-organization reports to this JSON file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Log composed campaigns instead of appending them to the outreach file
        #[arg(long)]
        dry_run: bool,
    },
    /// Scrape and analyze one domain, printing its report as JSON
    Analyze { domain: String },
    /// Load and validate the organizations roster and weight table
    Validate {
        #[arg(long)]
        organizations: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = painscout_core::load_app_config_from_env()?;
    init_tracing(&config.log_level);

    match cli.command {
        Some(Commands::Run {
            mode,
            organizations,
            prior_reports,
            output,
            dry_run,
        }) => {
            run::run_pipeline(
                &config,
                run::RunArgs {
                    mode,
                    organizations,
                    prior_reports,
                    output,
                    dry_run,
                },
            )
            .await?;
        }
        Some(Commands::Analyze { domain }) => inspect::run_analyze(&config, &domain).await?,
        Some(Commands::Validate { organizations }) => {
            inspect::run_validate(&config, organizations.as_deref())?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `PAINSCOUT_LOG_LEVEL`.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
