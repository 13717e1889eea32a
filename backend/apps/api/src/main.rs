//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors are mapped by each crate into the shared envelope.

mod config;

use std::net::SocketAddr;

use anyhow::{Context, bail};
use auth::{PgAuthRepository, auth_router};
use axum::{
    Router,
    http::{self, HeaderName, Method, header},
    routing::get,
};
use chrono::Utc;
use otp::{ConsoleSms, PgOtpRepository, SmsGateway, TwoFactorSms, otp_router};
use platform::bearer::TOKEN_HEADER;
use platform::token::{SigningKey, TokenConfig, TokenSigner};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,otp=info,auth=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    // Refuse to start without a usable signing key
    let signing_key = SigningKey::new(config.jwt_secret.as_bytes().to_vec())
        .context("JWT_SECRET rejected")?;
    let mut token_config = TokenConfig::new(signing_key);
    if let Some(ttl) = config.token_ttl {
        token_config = token_config.with_ttl(ttl).context("TOKEN_TTL_SECONDS rejected")?;
    }
    let signer = TokenSigner::new(token_config);

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: clear expired OTP challenges
    // Errors here should not prevent server startup
    let otp_repo = PgOtpRepository::new(pool.clone());
    if let Err(e) = otp_repo.purge_expired(Utc::now()).await {
        tracing::warn!(
            error = %e,
            "OTP challenge cleanup failed, continuing anyway"
        );
    }

    let sms = select_sms_gateway(config.sms_api_key.as_deref())?;

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_urls
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            HeaderName::from_static(TOKEN_HEADER),
            header::AUTHORIZATION,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/", get(|| async { "API Working" }))
        .nest(
            "/api/sms",
            otp_router(otp_repo, sms, signer.clone(), config.otp),
        )
        .nest(
            "/api/user",
            auth_router(PgAuthRepository::new(pool), signer, config.auth),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Real gateway when a key is configured; the console dispatcher only in
/// debug builds
fn select_sms_gateway(api_key: Option<&str>) -> anyhow::Result<SmsGateway> {
    match api_key {
        Some(key) => {
            let client = TwoFactorSms::new(key).context("Failed to build SMS client")?;
            tracing::info!("SMS gateway: 2Factor");
            Ok(SmsGateway::TwoFactor(client))
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("SMS_API_KEY not set, OTP codes will be logged instead of sent");
            Ok(SmsGateway::Console(ConsoleSms))
        }
        None => bail!("SMS_API_KEY must be set in release builds"),
    }
}
