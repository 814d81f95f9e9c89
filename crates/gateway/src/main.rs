//! LexForge Admin API Gateway
//!
//! The entry point for all admin API requests. Handles:
//! - Admin authentication
//! - Request routing
//! - Background job orchestration
//! - Observability (logging, metrics)

mod handlers;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use lexforge_common::{
    config::AppConfig,
    db::{DbPool, Repository},
    metrics, JobRunner,
};
use lexforge_dataprep::DataPrepService;
use lexforge_trainer::{DigestScoreStrategy, TrainerService};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub repo: Repository,
    pub runner: JobRunner,
    pub dataprep: DataPrepService,
    pub trainer: TrainerService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize tracing. RUST_LOG overrides the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("Starting LexForge Admin Gateway v{}", lexforge_common::VERSION);

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port > 0 {
        let metrics_addr =
            SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Metrics exporter listening on {}", metrics_addr);
    }

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;
    let repo = Repository::new(db.clone());

    // Background job runner shared by all services
    let runner = JobRunner::new(config.jobs.max_concurrent);

    let state = AppState {
        config: config.clone(),
        db,
        repo: repo.clone(),
        runner,
        dataprep: DataPrepService::new(repo.clone()),
        trainer: TrainerService::new(
            repo,
            config.jobs.clone(),
            Arc::new(DigestScoreStrategy),
        ),
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Admin routes, all behind API-key auth
    let admin_routes = Router::new()
        // Data preparation: documents
        .route("/data-preparation/documents", get(handlers::documents::list_documents))
        .route("/data-preparation/documents/upload", post(handlers::documents::upload_document))
        .route("/data-preparation/anonymize", post(handlers::documents::anonymize_documents))
        // Data preparation: pairs and export
        .route("/data-preparation/pairs", get(handlers::pairs::list_pairs))
        .route("/data-preparation/pairs/generate", post(handlers::pairs::generate_pairs))
        .route("/data-preparation/export", post(handlers::pairs::export_dataset))
        // Data preparation: metrics and jobs
        .route("/data-preparation/metrics", get(handlers::dataset::get_dataset_metrics))
        .route("/data-preparation/metrics/refresh", post(handlers::dataset::refresh_dataset_metrics))
        .route("/data-preparation/jobs", get(handlers::dataset::list_processing_jobs))
        .route("/data-preparation/jobs/{id}", get(handlers::dataset::get_processing_job))
        // Fine-tuning
        .route("/fine-tuning/jobs", get(handlers::fine_tuning::list_jobs))
        .route("/fine-tuning/jobs", post(handlers::fine_tuning::create_job))
        .route("/fine-tuning/jobs/{id}", get(handlers::fine_tuning::get_job))
        .route("/fine-tuning/jobs/{id}/metrics", get(handlers::fine_tuning::get_job_metrics))
        .route("/fine-tuning/jobs/{id}/validation", get(handlers::fine_tuning::get_job_validation))
        .route("/fine-tuning/jobs/{id}/progress", get(handlers::fine_tuning::get_job_progress))
        .route("/fine-tuning/jobs/{id}/cancel", post(handlers::fine_tuning::cancel_job))
        .route("/fine-tuning/jobs/{id}/deploy", post(handlers::fine_tuning::deploy_model))
        .route("/fine-tuning/stats", get(handlers::fine_tuning::get_stats))
        // Analytics
        .route("/analytics/overview", get(handlers::analytics::overview))
        .route("/analytics/training-trends", get(handlers::analytics::training_trends))
        .route("/analytics/model-performance", get(handlers::analytics::model_performance))
        .route("/analytics/data-quality", get(handlers::analytics::data_quality))
        .route("/analytics/system-health", get(handlers::analytics::system_health))
        .route("/analytics/performance-comparison", get(handlers::analytics::performance_comparison))
        // Admin
        .route("/admin/system-info", get(handlers::admin::system_info))
        .route("/admin/database-stats", get(handlers::admin::database_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ));

    let api_routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .merge(admin_routes);

    // Compose the app
    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::track::track_requests))
                .layer(cors)
                .layer(request_id)
                .layer(propagate_id),
        )
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
