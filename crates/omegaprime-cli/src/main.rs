use anyhow::Context;
use clap::Parser;
use omegaprime_core::{build_cycle, Config, Exporter, Scheduler};
use omegaprime_store::OpportunityStore;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "omegaprime")]
#[command(version, about = "Hunts airdrops, testnets, quests and bounties across RSS feeds", long_about = None)]
struct Cli {
    /// Config file (TOML). Falls back to the default location, then built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the database file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Override the snapshot file (.csv or .json)
    #[arg(long, global = true)]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run one scan cycle and exit (default)
    Scan,
    /// Scan forever at a fixed interval
    Watch {
        /// Minutes between cycles
        #[arg(long)]
        interval_minutes: Option<u64>,
    },
    /// Rewrite the snapshot from the database without scanning
    Export {
        /// Target file, format from the extension
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "omegaprime=info,omegaprime_core=info,omegaprime_store=info,omegaprime_api=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    config.apply_env();
    if let Some(database) = cli.database {
        config.storage.database = database;
    }
    if let Some(export) = cli.export {
        config.storage.export = export;
    }

    match cli.command.unwrap_or(Commands::Scan) {
        Commands::Scan => {
            let cycle = build_cycle(&config).context("Failed to set up scan")?;
            info!("OMEGA-PRIME started scanning...");
            cycle.run().await?;
        }
        Commands::Watch { interval_minutes } => {
            let interval = interval_minutes
                .map(|m| Duration::from_secs(m.saturating_mul(60)))
                .unwrap_or_else(|| config.scan.interval());
            let cycle = build_cycle(&config).context("Failed to set up scan")?;
            let cycle = &cycle;
            let scheduler = Scheduler::new(interval);

            info!("OMEGA-PRIME watching, one scan every {} minutes", interval.as_secs() / 60);
            tokio::select! {
                _ = scheduler.run(move || cycle.run()) => {}
                _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
            }
        }
        Commands::Export { path } => {
            let path = path.unwrap_or_else(|| config.storage.export.clone());
            let store = OpportunityStore::open(&config.storage.database)
                .with_context(|| format!("Failed to open {}", config.storage.database.display()))?;
            let records = store.ranked()?;
            Exporter::export_to_file(&records, &path)?;
            info!("Exported {} records to {}", records.len(), path.display());
        }
    }

    Ok(())
}
