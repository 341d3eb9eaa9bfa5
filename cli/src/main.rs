use anyhow::Result;
use clap::{Parser, Subcommand};
use loot_core::database::Database;
use loot_core::export::read_export;
use loot_core::models::QueryFilters;
use loot_core::output::{write_csv, write_drops_lines};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(
    name = "osrs-loot",
    version = "0.1.0",
    about = "Build and query an OSRS monster drop database",
    long_about = None
)]
struct Cli {
    /// Path to the SQLite loot database
    #[arg(long, short = 'd', global = true, default_value = "loot_database.db")]
    database: std::path::PathBuf,

    /// Path to log file
    #[arg(long, global = true, default_value = "/tmp/osrs-loot.log")]
    log_file: std::path::PathBuf,

    /// Verbosity level (repeat for more verbose output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a wiki export into a fresh loot database
    Build {
        /// MediaWiki XML export containing monster pages
        export_file: std::path::PathBuf,
    },

    /// Query the drop table
    Query {
        /// Search for items dropped by a monster (SQL LIKE pattern)
        #[arg(long, short = 'm')]
        monster: Option<String>,

        /// Search for monsters dropping an item (SQL LIKE pattern)
        #[arg(long, short = 'i')]
        item: Option<String>,

        /// Restrict results to those available to free players
        #[arg(long, short = 'f')]
        f2p: bool,

        /// Restrict results to monsters at or below a slayer level
        #[arg(long, short = 's')]
        slayer_lvl: Option<u32>,

        /// Restrict results to monsters at or below a combat level
        #[arg(long, short = 'c')]
        combat_lvl: Option<u32>,

        /// Format output as OSRS Wiki ItemDropsLine markup instead of CSV
        #[arg(long)]
        drops_line: bool,
    },
}

fn setup_logging(
    verbose: u8,
    log_file: &std::path::Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let filter_level = match verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(filter_level.into());

    let file_appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or(std::path::Path::new(".")),
        log_file
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("osrs-loot.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::new().with_writer(std::io::stderr).with_ansi(true))
        .with(fmt::Layer::new().with_writer(non_blocking).with_ansi(false));

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(cli.verbose, &cli.log_file)?;

    match cli.command {
        Commands::Build { export_file } => {
            info!("Extracting wiki export {:?}", export_file);
            let extraction = read_export(&export_file)?;
            info!(
                "Extracted {} monsters and {} distinct items",
                extraction.monsters.len(),
                extraction.item_names.len()
            );

            let db = Database::new(&cli.database)?;
            db.build(&extraction)?;
            info!("Loot database written to {:?}", cli.database);
        }
        Commands::Query {
            monster,
            item,
            f2p,
            slayer_lvl,
            combat_lvl,
            drops_line,
        } => {
            let filters = QueryFilters {
                monster,
                item,
                f2p,
                max_slayer_lvl: slayer_lvl,
                max_combat_lvl: combat_lvl,
            };

            let db = Database::new(&cli.database)?;
            let rows = db.query_drops(&filters)?;
            info!("Query returned {} rows", rows.len());

            let stdout = std::io::stdout().lock();
            if drops_line {
                write_drops_lines(&rows, stdout)?;
            } else {
                write_csv(&rows, stdout)?;
            }
        }
    }

    Ok(())
}
