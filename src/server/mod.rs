pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

use crate::config::AppConfig;
use crate::database::{connection::*, migrations::Migrator, seed_data};
use anyhow::Result;
use sea_orm_migration::prelude::*;
use tracing::{info, warn};

pub async fn start_server(config: AppConfig) -> Result<()> {
    let database_url = get_database_url(Some(&config.server.database));
    let db = establish_connection(&database_url).await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    seed_data::seed_reference_data(&db).await?;
    if config.demo_mode {
        warn!("Demo mode enabled: sign-up is disabled and demo accounts are available");
        seed_data::seed_demo(&db).await?;
    }

    let port = config.server.port;
    let app = app::create_app(db, &config).await?;

    log_routes(port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes(port: u16) {
    info!("API Endpoints (http://localhost:{}):", port);
    info!("  /health                     - Health check");
    info!("  /api/v1/auth/*              - Sign up, sign in, sign out, session, profile");
    info!("  /api/v1/navigation          - Menu and layout shell for the caller's role");
    info!("  /api/v1/dashboard           - Alumnus or staff dashboard");
    info!("  /api/v1/alumni              - Alumni listing, intake, CSV import and export");
    info!("  /api/v1/coordinators        - Coordinator intake");
    info!("  /api/v1/survey-templates    - Survey authoring and publishing");
    info!("  /api/v1/surveys             - Survey listing and responses");
    info!("  /api/v1/events              - Events, registration and ratings");
    info!("  /api/v1/reports             - Institutional reports and CSV export");
    info!("  /api/v1/corrective-actions  - Pedagogical feedback follow-up");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}
