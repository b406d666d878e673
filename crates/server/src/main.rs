//! Grievance backend server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware};
use grievance_api::{middleware::AppState, router as api_router};
use grievance_common::{Config, storage::LocalStorage};
use grievance_core::{
    AnalyticsService, AssignmentEngine, AuthService, ComplaintService, EmailService, Notifier,
    OfficerApprovalService, TokenService,
};
use grievance_db::repositories::{
    ComplaintNoteRepository, ComplaintReplyRepository, ComplaintRepository,
    ComplaintStatusHistoryRepository, OfficerRepository, PasswordResetTokenRepository,
    PendingOfficerRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment variables from .env take effect before config loading
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grievance=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting grievance backend...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = grievance_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    grievance_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let officer_repo = OfficerRepository::new(Arc::clone(&db));
    let pending_officer_repo = PendingOfficerRepository::new(Arc::clone(&db));
    let reset_token_repo = PasswordResetTokenRepository::new(Arc::clone(&db));
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let reply_repo = ComplaintReplyRepository::new(Arc::clone(&db));
    let note_repo = ComplaintNoteRepository::new(Arc::clone(&db));
    let history_repo = ComplaintStatusHistoryRepository::new(Arc::clone(&db));

    // Initialize services
    let token_service = TokenService::new(&config.auth.jwt_secret, config.auth.token_expiry_hours);
    let email_service = EmailService::new(config.mail.as_ref(), &config.server.url)?;
    if email_service.is_enabled() {
        info!("SMTP mail delivery enabled");
    } else {
        info!("No mail configuration, emails will be logged and skipped");
    }
    let notifier = Notifier::new(email_service);

    let auth_service = AuthService::new(
        user_repo.clone(),
        officer_repo.clone(),
        pending_officer_repo.clone(),
        reset_token_repo,
        token_service.clone(),
        notifier.clone(),
    );
    let assignment = AssignmentEngine::new(officer_repo.clone(), complaint_repo.clone());
    let complaint_service = ComplaintService::new(
        complaint_repo.clone(),
        reply_repo,
        note_repo,
        history_repo,
        officer_repo.clone(),
        user_repo.clone(),
        assignment,
        notifier.clone(),
    );
    let approval_service = OfficerApprovalService::new(
        officer_repo.clone(),
        pending_officer_repo,
        user_repo,
        notifier,
    );
    let analytics_service = AnalyticsService::new(complaint_repo, officer_repo);

    // Initialize file storage
    let upload_dir = PathBuf::from(&config.uploads.dir);
    tokio::fs::create_dir_all(&upload_dir).await?;
    let storage = Arc::new(LocalStorage::new(
        upload_dir.clone(),
        config.uploads.base_url.clone(),
    ));

    // Create app state
    let state = AppState {
        auth_service,
        complaint_service,
        approval_service,
        analytics_service,
        token_service,
        storage,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(
            config.uploads.base_url.trim_end_matches('/'),
            ServeDir::new(upload_dir),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            grievance_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
