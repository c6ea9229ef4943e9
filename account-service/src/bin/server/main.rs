use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::auth::ports::SessionStore;
use account_service::domain::auth::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::directory::PostgresUserDirectory;
use account_service::outbound::mail::HttpMailGateway;
use account_service::outbound::sessions::InMemorySessionStore;
use auth::token::refresh_ttl;
use auth::TokenCodec;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // The signing secret stays out of the logs.
    tracing::info!(
        http_port = config.server.http_port,
        mail_service = %config.mail.service_url,
        clock_skew_seconds = config.auth.clock_skew_seconds,
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

    let codec = Arc::new(
        TokenCodec::new(config.auth.secret.as_bytes()).with_leeway(config.auth.clock_skew_seconds),
    );
    let directory = Arc::new(PostgresUserDirectory::new(pg_pool));
    let sessions = Arc::new(InMemorySessionStore::new());
    let mail = Arc::new(HttpMailGateway::new(config.mail.clone()));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&directory),
        Arc::clone(&sessions),
        mail,
        Arc::clone(&codec),
    ));

    // Sessions older than the refresh TTL can never be used again;
    // sweep them out hourly.
    let prune_store = Arc::clone(&sessions);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let pruned = prune_store.prune_expired(refresh_ttl()).await;
            if pruned > 0 {
                tracing::debug!(pruned, "Expired sessions pruned");
            }
        }
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, directory, codec);

    axum::serve(http_listener, http_application).await?;

    Ok(())
}
