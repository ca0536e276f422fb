use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verde_api::config::{LogFormat, ServerConfig, StorageBackend};
use verde_api::router::{build_app_router, LOCAL_FILES_PREFIX};
use verde_api::state::AppState;
use verde_cloud::auth::{AuthProvider, GoTrueClient};
use verde_cloud::geocoding::Geocoder;
use verde_cloud::storage::{LocalFsStore, ObjectStore, SupabaseStorage};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verde_api=debug,tower_http=debug".into()),
        )
        .with(pretty)
        .with(json)
        .init();

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = verde_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    verde_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    verde_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Outbound clients ---
    let http = verde_cloud::http_client().expect("Failed to build HTTP client");

    let auth: Arc<dyn AuthProvider> = Arc::new(GoTrueClient::new(
        http.clone(),
        &config.supabase.url,
        config.supabase.anon_key.clone(),
    ));

    let storage: Arc<dyn ObjectStore> = match config.storage.backend {
        StorageBackend::Supabase => Arc::new(SupabaseStorage::new(
            http.clone(),
            &config.supabase.url,
            config.supabase.storage_key().to_string(),
        )),
        StorageBackend::Local => {
            tracing::info!(root = %config.storage.local_root.display(), "Using local object storage");
            Arc::new(LocalFsStore::new(
                config.storage.local_root.clone(),
                LOCAL_FILES_PREFIX,
            ))
        }
    };

    let geocoder = Arc::new(Geocoder::new(
        http,
        &config.geocoder.base_url,
        config.geocoder.user_agent.clone(),
        config.geocoder.contact_email.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        auth,
        storage,
        geocoder,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                stop_rx.await.ok();
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            match result {
                Ok(Ok(())) => tracing::info!("Server exited"),
                Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
                Err(e) => tracing::error!(error = %e, "Server task panicked"),
            }
            pool.close().await;
            return;
        }
        () = shutdown_signal() => {}
    }

    // --- Drain in-flight requests ---
    stop_tx.send(()).ok();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, &mut server).await {
        Ok(_) => tracing::info!("In-flight requests drained"),
        Err(_) => {
            tracing::warn!(timeout_secs = drain.as_secs(), "Shutdown timeout elapsed, aborting");
            server.abort();
        }
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
