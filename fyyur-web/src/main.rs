use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use fyyur_core::storage::{DatabaseStorage, InMemoryStorage, Storage};
use fyyur_core::DatabaseManager;
use fyyur_web::config::Config;
use fyyur_web::logging::init_logging;
use fyyur_web::seed::{seed_sample_data, SeedOutcome};
use fyyur_web::{app_router, AppState};

#[derive(Parser)]
#[command(name = "fyyur")]
#[command(about = "Fyyur: list venues and artists, and book shows")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./fyyur.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (default)
    Serve {
        /// Port to listen on, overriding config and PORT
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep everything in memory instead of the database file
        #[arg(long)]
        in_memory: bool,

        /// Load the sample listings into an empty store before serving
        #[arg(long)]
        seed: bool,
    },
    /// Create or update the database schema
    Migrate,
    /// Insert sample venues, artists and shows into an empty database
    Seed,
    /// Delete all venues, artists and shows
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();

    let mut config = Config::load(cli.config.as_deref())?;
    let _log_guard = init_logging(&config.logging)?;

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        in_memory: false,
        seed: false,
    }) {
        Command::Serve { port, in_memory, seed } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, in_memory, seed).await
        }
        Command::Migrate => {
            let db = DatabaseManager::open(&config.database.path).await?;
            db.run_migrations().await?;
            println!("✅ Database schema is up to date ({})", config.database.path.display());
            Ok(())
        }
        Command::Seed => {
            let storage = DatabaseStorage::open(&config.database.path).await?;
            report_seed(seed_sample_data(&storage).await?);
            Ok(())
        }
        Command::Clear { yes } => {
            if !yes {
                println!("⚠️  WARNING: This will delete ALL data from {}!", config.database.path.display());
                println!("Press Enter to continue or Ctrl+C to cancel...");
                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;
            }
            let db = DatabaseManager::open(&config.database.path).await?;
            db.run_migrations().await?;
            db.clear_all_data().await?;
            println!("✅ Database cleared successfully!");
            Ok(())
        }
    }
}

async fn serve(config: Config, in_memory: bool, seed: bool) -> anyhow::Result<()> {
    let storage: Arc<dyn Storage> = if in_memory {
        info!("Using in-memory storage");
        Arc::new(InMemoryStorage::new())
    } else {
        info!("Opening database at {}", config.database.path.display());
        Arc::new(DatabaseStorage::open(&config.database.path).await?)
    };

    if seed {
        report_seed(seed_sample_data(storage.as_ref()).await?);
    }

    let app = app_router(AppState::new(storage), &config.server.static_dir);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    info!("Fyyur listening on {}", bind_addr);
    println!("🚀 Fyyur listening on {} (visit http://127.0.0.1:{})", bind_addr, config.server.port);
    axum::serve(listener, app).await?;
    Ok(())
}

fn report_seed(outcome: SeedOutcome) {
    match outcome {
        SeedOutcome::Seeded { venues, artists, shows } => {
            println!("🌱 Seeded {venues} venues, {artists} artists and {shows} shows");
        }
        SeedOutcome::Skipped => println!("Database already has listings, nothing seeded"),
    }
}
