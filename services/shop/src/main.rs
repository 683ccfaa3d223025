use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod extract;
mod models;
mod password;
mod repositories;
mod routes;
mod state;

use common::{
    database::{health_check, init_pool},
    migrations::Migrator,
};
use tokio::net::TcpListener;

use crate::{
    config::Settings, models::Catalog, repositories::UserRepository, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shop=info,common=info,tower_http=info".into());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting furniture shop service");

    let settings = Settings::new()?;
    let collection = settings.database.collection_name()?;

    // Initialize database connection pool
    let pool = init_pool(&settings.database).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    if settings.database.run_migrations {
        let applied = Migrator::new(collection.clone()).run_pending(&pool).await?;
        info!("Applied {} migration(s) to {}", applied.len(), collection);
    }

    // Prime the placeholder hash used for logins with unknown emails
    password::verify_unknown(String::new()).await?;

    let user_repository = UserRepository::new(pool.clone(), collection);
    let catalog = match settings.catalog {
        Some(items) => Catalog::new(items).map_err(anyhow::Error::msg)?,
        None => Catalog::default(),
    };
    info!("Serving {} catalog item(s)", catalog.items().len());

    let app_state = AppState::new(Arc::new(user_repository), catalog);

    // Start the web server
    let app = routes::create_app(app_state, &settings.server)?;

    let addr = settings.server.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Furniture shop listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Furniture shop stopped");

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
