//! Gusto Registration Service
//!
//! Main entry point for the Gusto event registration backend.
//! This service provides:
//! - HTTP API for the registration wizard (catalog, selection checks, submission)
//! - Atomic registration writes with payment screenshot upload
//! - Background confirmation emails

use gusto_registration::catalog::Catalog;
use gusto_registration::config::{AppConfig, StorageConfig};
use gusto_registration::database::{create_pool, run_migrations, Database};
use gusto_registration::error::{AppError, AppResult};
use gusto_registration::notifications::{LogNotifier, NotificationDispatcher, Notifier, SmtpNotifier};
use gusto_registration::repositories::PgRegistrationStore;
use gusto_registration::services::RegistrationService;
use gusto_registration::{routes, storage, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    init_tracing(&config);

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║          Gusto Registration Service Starting             ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);

    // =========================================================================
    // DATABASE SETUP
    // =========================================================================
    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    info!("Database connection pool created successfully");
    info!("Max connections: {}", config.database.max_connections);

    info!("Running database migrations...");
    run_migrations(&pool, None).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    info!("Database migrations completed successfully");

    // =========================================================================
    // CORE SERVICES INITIALIZATION
    // =========================================================================
    info!("Initializing core services...");

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            Catalog::from_json_file(path, &config.default_pass_id)?
        }
        None => Catalog::builtin(&config.default_pass_id)?,
    };
    info!(
        "✓ Catalog loaded: {} events, {} passes (default pass: {})",
        catalog.list_events().len(),
        catalog.list_passes().len(),
        catalog.default_pass().id
    );

    let blobs = storage::from_config(&config.storage)
        .map_err(|e| AppError::Config(format!("Blob storage initialization failed: {}", e)))?;
    match &config.storage {
        StorageConfig::Local { root, .. } => {
            info!("✓ Blob storage initialized (local: {})", root.display())
        }
        StorageConfig::Http { endpoint, bucket, .. } => {
            info!("✓ Blob storage initialized (http: {}, bucket {})", endpoint, bucket)
        }
    }

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => {
            let notifier = SmtpNotifier::new(smtp)
                .map_err(|e| AppError::Config(format!("SMTP initialization failed: {}", e)))?;
            info!("✓ SMTP notifier initialized ({}:{})", smtp.host, smtp.port);
            Arc::new(notifier)
        }
        None => {
            warn!("SMTP not configured - confirmation emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let service = RegistrationService::new(
        Arc::new(catalog),
        Arc::new(PgRegistrationStore::new(pool.clone())),
        blobs,
        NotificationDispatcher::new(notifier),
        config.registration_timeout(),
    );
    info!(
        "✓ Registration service initialized (timeout {}s)",
        config.registration_timeout_secs
    );

    let state = AppState::new(service, Some(Database::new(pool)));

    // =========================================================================
    // START SERVER
    // =========================================================================
    let mut app = routes::app(state, config.max_upload_bytes);
    if let StorageConfig::Local { root, .. } = &config.storage {
        app = app.nest_service("/uploads", ServeDir::new(root));
    }

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid HTTP address: {}", e)))?;

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        AppError::Message(format!("Failed to bind HTTP server: {}", e))
    })?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║          Gusto Registration Service Ready!               ║");
    info!("╠══════════════════════════════════════════════════════════╣");
    info!("║  HTTP API:     {}                                ║", addr);
    info!("║  Environment:  {}                                ║", config.environment);
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gusto registration service shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "gusto_registration={},sqlx=warn,tower_http=info",
            config.log_level
        )
        .into()
    });

    if config.is_json_logging() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving; the process can still be stopped externally
        futures::future::pending::<()>().await;
    }
    info!("Shutdown signal received, shutting down gracefully...");
}
