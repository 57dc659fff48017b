use std::path::{Path, PathBuf};

use clap::Parser;
use version_prune::{
    catalog::{RecordType, TypeCatalog},
    config::{self, PrunerConfig},
    db::DbPool,
    observability,
    prune::{ConsoleSink, InvocationMode, PruneError, RetentionPruner, RunSettings},
};

/// Exit status for configuration and argument errors (same as clap's).
const EXIT_CONFIG: i32 = 2;
/// Exit status for database and run failures.
const EXIT_FAILURE: i32 = 1;

/// CLI arguments for version-prune
#[derive(Parser, Debug)]
#[command(version, about = "Prune row-version history from versioned tables", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ./version-prune.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Prune version history for every configured record type
    ///
    /// Trims each live record to its most recent versions, deletes the
    /// history of records that no longer exist, and deletes subtype
    /// versions with no base version row.
    Prune {
        /// `yes` to prune, `dry` to only count, `fast` to prune without the
        /// per-record trim
        #[arg(long)]
        run: InvocationMode,
        /// Versions to keep per live record (values below 1 mean 5)
        #[arg(long, allow_negative_numbers = true)]
        keep: Option<i64>,
    },
    /// List configured record types with their version row counts
    Types,
    /// Validate the config file and record type catalog, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config_path = resolve_config_path(args.config.as_deref());

    match args.command {
        Command::Prune { run, keep } => run_prune(&config_path, run, keep).await,
        Command::Types => run_types(&config_path).await,
        Command::CheckConfig => run_check_config(&config_path),
    }
}

/// Resolve the config file: `--config` if given, else the default file in
/// the working directory.
fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE))
}

fn load_config(config_path: &Path) -> PrunerConfig {
    match PrunerConfig::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {}",
                config_path.display(),
                e
            );
            std::process::exit(EXIT_CONFIG);
        }
    }
}

/// Load config, start logging and connect to the database.
async fn init(config_path: &Path) -> (PrunerConfig, Vec<RecordType>, DbPool) {
    let config = load_config(config_path);

    if let Err(e) = observability::init_tracing(&config.logging) {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    let types = match config.catalog() {
        Ok(catalog) => catalog.base_types(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let pool = match DbPool::from_config(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            eprintln!("Error: Failed to connect to database: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    tracing::info!(
        config_file = %config_path.display(),
        dialect = ?pool.dialect(),
        record_types = types.len(),
        "Connected to database"
    );

    (config, types, pool)
}

async fn run_prune(config_path: &Path, run: InvocationMode, keep: Option<i64>) {
    let (config, types, pool) = init(config_path).await;
    let settings = RunSettings::new(run, keep, &config.prune);

    if run == InvocationMode::Execute {
        println!("WARNING: Pruning permanently deletes the version history of archived records.");
        println!("They can no longer be restored once this run completes.");
        println!();
    }

    tracing::info!(
        mode = %run,
        keep = settings.keep.get(),
        batch_size = settings.batch_size,
        "Starting prune run"
    );

    let pruner = RetentionPruner::new(pool.versions(), settings.batch_size);
    let result = pruner.run(&types, &settings, &ConsoleSink).await;
    pool.close().await;

    match result {
        Ok(report) => {
            tracing::info!(
                total = report.total(),
                dry_run = report.dry_run,
                "Prune run finished"
            );
        }
        Err(PruneError::Incomplete { failed, completed }) => {
            eprintln!(
                "Error: Pruning failed for {}. {} record type(s) completed, {} row(s) {}.",
                failed.join(", "),
                completed.types.len(),
                completed.total(),
                if completed.dry_run {
                    "would be pruned"
                } else {
                    "pruned"
                }
            );
            std::process::exit(EXIT_FAILURE);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

async fn run_types(config_path: &Path) {
    let (_config, types, pool) = init(config_path).await;
    let repo = pool.versions();

    let mut failed = false;
    for record_type in &types {
        println!("{}", record_type.name());
        let tables = std::iter::once(record_type.base_table()).chain(record_type.subtype_tables());
        for table in tables {
            let versions = table.versions();
            match repo.count_versions(&versions, None).await {
                Ok(count) => println!("  {versions}: {count} version rows"),
                Err(e) => {
                    tracing::error!(table = %versions, error = %e, "Failed to count versions");
                    println!("  {versions}: error: {e}");
                    failed = true;
                }
            }
        }
    }

    pool.close().await;
    if failed {
        std::process::exit(EXIT_FAILURE);
    }
}

fn run_check_config(config_path: &Path) {
    let config = load_config(config_path);
    let types = match config.catalog() {
        Ok(catalog) => catalog.record_types(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    println!("Config OK: {}", config_path.display());
    for record_type in types.iter().filter(|t| t.is_hierarchy_root()) {
        println!("  {}", record_type.name());
        println!("    {}", record_type.versions_table());
        for subtype in record_type.subtype_tables() {
            println!("    {} (orphan sweep)", subtype.versions());
        }
    }
}
