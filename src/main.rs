use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use alumni_portal::config::{AppConfig, CliOverrides};
use alumni_portal::database::{
    connection::{establish_connection, get_database_url, setup_database, DEFAULT_DATABASE},
    seed_data,
};
use alumni_portal::server;
use alumni_portal::services::{AlumniService, ImportService};

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
        /// YAML configuration file; flags win over its values
        #[clap(short, long)]
        config: Option<PathBuf>,
        /// Seed demo accounts and disable sign-up
        #[clap(long)]
        demo: bool,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    /// Import alumni from a CSV file
    ImportAlumni {
        #[clap(short, long)]
        file: PathBuf,
        #[clap(short, long, default_value = DEFAULT_DATABASE)]
        database: String,
    },
    /// Seed reference data, demo accounts, a survey and events
    SeedDemo {
        #[clap(short, long, default_value = DEFAULT_DATABASE)]
        database: String,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long, default_value = DEFAULT_DATABASE)]
        database: String,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long, default_value = DEFAULT_DATABASE)]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
            config,
            demo,
        } => {
            let config = AppConfig::resolve(
                config.as_deref(),
                CliOverrides {
                    port,
                    database,
                    cors_origin,
                    demo,
                },
            )?;
            info!("Starting server on port {}", config.server.port);
            server::start_server(config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database } => {
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
        Commands::ImportAlumni { file, database } => {
            let db = establish_connection(&get_database_url(Some(&database))).await?;
            setup_database(&db).await?;
            seed_data::seed_reference_data(&db).await?;

            let result = ImportService::new(AlumniService::new(db))
                .import_file(&file)
                .await?;
            info!("Imported {} alumni", result.success);
            for error in &result.errors {
                warn!("{}", error);
            }
        }
        Commands::SeedDemo { database } => {
            info!("Seeding demo data into {}", database);
            let db = establish_connection(&get_database_url(Some(&database))).await?;
            setup_database(&db).await?;
            seed_data::seed_demo(&db).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
