use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_service::{config::Config, handlers, middleware::JwtAuthMiddleware, security::jwt};

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Starting auth-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Install the shared signing secret before binding: a missing or empty
    // JWT_SECRET aborts startup instead of producing unverifiable tokens.
    jwt::initialize_secret(&config.jwt.secret)
        .context("Failed to initialize JWT signing secret")?;
    tracing::info!("JWT signing secret initialized");

    let bind_host = config.app.host.clone();
    let bind_port = config.app.port;
    tracing::info!("Listening on {}:{}", bind_host, bind_port);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .max_age(config.cors.max_age as usize);

        App::new()
            .service(
                web::scope("/api/v1")
                    .route("/health", web::get().to(handlers::health_check))
                    .route("/me", web::get().to(handlers::current_identity)),
            )
            .wrap(JwtAuthMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
    })
    .bind((bind_host, bind_port))?
    .run()
    .await
    .context("HTTP server terminated")
}
