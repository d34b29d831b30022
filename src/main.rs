mod autocomplete;
mod cli;
mod config;
mod db;
mod handlers;
mod http;
mod importer;
mod init;
mod manager;
mod models;
mod store;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use cli::Commands;
use handlers::{Consts, Ctx};
use manager::Manager;
use store::SqliteStore;

#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    init::init_logger(log::LevelFilter::Info);

    let cli = cli::Cli::parse();

    // Handle CLI flags.
    if let Some(cmd) = cli.command {
        match cmd {
            // Generate a new config file.
            Commands::NewConfig { path } => {
                match config::generate_sample(&path) {
                    Ok(_) => {
                        log::info!("config file generated: {}", path.display());
                    }
                    Err(e) => {
                        log::error!("error generating config: {}", e);
                        std::process::exit(1);
                    }
                }
                return;
            }

            // Create a new SQLite database with schema and seed data.
            Commands::Install { yes } => {
                let db_path = db_path(&cli.db_path, &cli.config);
                if PathBuf::from(&db_path).exists() {
                    log::error!("database '{}' already exists", db_path);
                    std::process::exit(1);
                }
                if let Err(e) = db::install_schema(&db_path, !yes).await {
                    log::error!("error installing schema: {}", e);
                    std::process::exit(1);
                }
                return;
            }

            // Import states from a CSV file.
            Commands::Import { file } => {
                let db_path = db_path(&cli.db_path, &cli.config);
                db::exists(db_path.as_ref());

                if let Err(e) = importer::import_csv(&file, &db_path).await {
                    log::error!("error importing: {}", e);
                    std::process::exit(1);
                }
                return;
            }
        }
    }

    // Load config.
    let mut config = config::load_all(&cli.config);
    if let Some(p) = &cli.db_path {
        config.db.path = p.to_string_lossy().to_string();
    }

    // For server mode, DB must exist.
    db::exists(config.db.path.as_ref());

    // Create database pool.
    let db = match db::init(&config.db.path, config.db.max_conns).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    // Load the catalog into the prefix index.
    let store = Arc::new(SqliteStore::new(db));
    let mgr = match Manager::load(store).await {
        Ok(m) => Arc::new(m),
        Err(e) => {
            log::error!("error loading catalog: {}", e);
            std::process::exit(1);
        }
    };

    let ctx = Arc::new(Ctx {
        mgr,
        consts: Consts {
            allowed_origins: config.app.allowed_origins,
        },
    });

    // Start the HTTP server.
    let routes = http::init_handlers(ctx);
    let addr = config.app.address;

    log::info!("starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("error listening on {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, routes).await {
        log::error!("server error: {}", e);
        std::process::exit(1);
    }
}

/// Resolve the DB path from the --db flag, falling back to the config files.
fn db_path(flag: &Option<PathBuf>, config_paths: &[PathBuf]) -> String {
    match flag {
        Some(p) => p.to_string_lossy().to_string(),
        None => config::load_all(config_paths).db.path,
    }
}
