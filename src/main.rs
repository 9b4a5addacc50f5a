use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use vtable::config::ServerConfig;
use vtable::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(short, long)]
        database: Option<String>,
        #[clap(long)]
        cors_origin: Option<String>,
        /// TOML file with server settings; flags take precedence
        #[clap(short, long)]
        config: Option<PathBuf>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    Init {
        #[clap(short, long, default_value = "vtable.db")]
        database: String,
    },
    Migrate {
        #[clap(short, long, default_value = "vtable.db")]
        database: String,
        #[clap(subcommand)]
        direction: server::MigrateDirection,
    },
    /// Load the demo user and sample tables
    Seed {
        #[clap(short, long, default_value = "vtable.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
            config,
        } => {
            let base = match config {
                Some(path) => ServerConfig::from_file(&path)?.with_env()?,
                None => ServerConfig::from_env()?,
            };
            let config = ServerConfig {
                port: port.unwrap_or(base.port),
                database: database.unwrap_or(base.database),
                cors_origin: cors_origin.or(base.cors_origin),
                log_level: args.log_level.unwrap_or(base.log_level),
            };

            setup_logging(&config.log_level);
            server::start_server(&config).await?;
        }
        Commands::Db { command } => {
            setup_logging(args.log_level.as_deref().unwrap_or("info"));

            match command {
                DbCommands::Init { database } => {
                    server::init_database(&database).await?;
                }
                DbCommands::Migrate {
                    database,
                    direction,
                } => {
                    server::migrate_database(&database, direction).await?;
                }
                DbCommands::Seed { database } => {
                    server::seed_database(&database).await?;
                }
            }
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    let log_level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .without_time()
        .init();
}
