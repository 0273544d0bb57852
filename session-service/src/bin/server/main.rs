use std::sync::Arc;

use auth::PasswordHasher;
use auth::SessionGuard;
use auth::TokenCodec;
use session_service::config::Config;
use session_service::domain::credential::service::AuthService;
use session_service::inbound::http::router::create_router;
use session_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "session-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let session_policy = config.session.policy()?;
    let password_hasher = PasswordHasher::with_cost(config.password.cost())?;

    tracing::info!(
        http_port = config.server.http_port,
        session_ttl_minutes = config.session.ttl_minutes,
        renewal_window_minutes = config.session.renewal_window_minutes,
        max_lifetime_hours = ?config.session.max_lifetime_hours,
        password_memory_kib = config.password.memory_kib,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_codec = Arc::new(TokenCodec::new(config.session.secret.as_bytes()));
    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        credential_store,
        password_hasher,
        Arc::clone(&token_codec),
        session_policy.ttl(),
    ));
    let session_guard = Arc::new(SessionGuard::new(token_codec, session_policy));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, session_guard);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
