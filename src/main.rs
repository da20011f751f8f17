//! perm-optimizer - remove redundant inventory permissions
//!
//! Runs the optimizer against an exported inventory snapshot. Configuration
//! is layered: config file, then `PERM_OPTIMIZER_*` environment variables,
//! then command-line flags.

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use perm_optimizer::config::ConfigOverrides;
use perm_optimizer::utils::logging::init_logging;
use perm_optimizer::{
    Config, InMemoryInventory, InventorySnapshot, OptimizerError, PermissionOptimizer,
    build_info,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

const EXIT_FAILURE: u8 = 1;
/// Exit code when the run finished but recorded errors or was cancelled
const EXIT_INCOMPLETE: u8 = 2;
/// Exit code when the run was rejected before any entity was processed
const EXIT_ABORTED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(
    name = "perm-optimizer",
    version,
    about = "Remove permissions already granted by an ancestor in the inventory tree"
)]
struct Cli {
    /// Inventory snapshot (YAML, or JSON with a .json extension)
    #[arg(short, long, env = "PERM_OPTIMIZER_INVENTORY")]
    inventory: PathBuf,

    /// Root to scan, by id or name path; repeatable
    #[arg(short, long = "root")]
    roots: Vec<String>,

    /// Configuration file
    #[arg(short, long, env = "PERM_OPTIMIZER_CONFIG")]
    config: Option<PathBuf>,

    /// Remove redundant permissions instead of only reporting them
    #[arg(long)]
    apply: bool,

    /// Ignore ancestor grants that do not propagate
    #[arg(long)]
    respect_propagate: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the resulting inventory snapshot to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Log level or filter directives
    #[arg(long)]
    log_level: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// Settings given on the command line; absent flags leave lower layers alone
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dry_run: self.apply.then_some(false),
            roots: (!self.roots.is_empty()).then(|| self.roots.clone()),
            respect_propagate: self.respect_propagate.then_some(true),
            log_level: self.log_level.clone(),
            log_json: self.log_json.then_some(true),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Runs rejected before touching the inventory get their own exit code
fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<OptimizerError>() {
        Some(error) if error.is_fatal_for_run() => EXIT_ABORTED,
        _ => EXIT_FAILURE,
    }
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let env = ConfigOverrides::from_env().context("invalid environment configuration")?;
    let config = base.with_overrides(env.merge(cli.overrides()));
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli).await?;
    init_logging(config.logging())?;

    info!(build = %build_info(), "perm-optimizer starting");

    let snapshot = InventorySnapshot::from_file(&cli.inventory)
        .await
        .with_context(|| format!("failed to load inventory {}", cli.inventory.display()))?;
    let inventory = Arc::new(InMemoryInventory::from_snapshot(&snapshot)?);

    let roots: Vec<String> = if config.roots().is_empty() {
        inventory
            .top_level()
            .into_iter()
            .map(|entity| entity.id)
            .collect()
    } else {
        config.roots().to_vec()
    };
    if roots.is_empty() {
        bail!("inventory snapshot contains no entities");
    }

    let optimizer =
        PermissionOptimizer::from_config(inventory.clone(), inventory.clone(), &config.optimizer);

    let handle = optimizer.cancellation_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current entity");
            handle.cancel();
        }
    });

    let report = optimizer
        .optimize(&roots, config.optimizer.dry_run)
        .await?;

    match cli.format {
        OutputFormat::Table => println!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Yaml => print!("{}", report.to_yaml()?),
    }

    if let Some(path) = &cli.save {
        if report.dry_run {
            warn!("Dry run: saved snapshot is unchanged");
        }
        inventory
            .to_snapshot()
            .save(path)
            .await
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INCOMPLETE)
    })
}
