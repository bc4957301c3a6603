// src/main.rs
use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use thesis_sessions::application::{
    ports::{
        accounts::{CredentialStore, UserDirectory},
        cache::CacheStore,
        security::{PasswordHasher, TokenCodec},
        time::Clock,
    },
    services::ApplicationServices,
};
use thesis_sessions::config::{AppConfig, CacheBackend};
use thesis_sessions::infrastructure::{
    cache::{InMemoryCacheStore, RedisCacheStore},
    database,
    repositories::PostgresAccountStore,
    security::{password::Argon2PasswordHasher, token::JwtTokenCodec},
    time::SystemClock,
};
use thesis_sessions::presentation::http::{routes::build_router, state::HttpState};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = build_cache_store(&config, Arc::clone(&clock))?;

    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let accounts = Arc::new(PostgresAccountStore::new(pool.clone(), password_hasher));
    let credentials: Arc<dyn CredentialStore> = accounts.clone();
    let directory: Arc<dyn UserDirectory> = accounts;

    let codec: Arc<dyn TokenCodec> = Arc::new(JwtTokenCodec::new(
        config.secret_key(),
        config.token_ttl(),
        Arc::clone(&clock),
    )?);

    let services = Arc::new(ApplicationServices::new(
        credentials,
        directory,
        codec,
        cache,
        clock,
    ));

    let state = HttpState {
        services,
        db_pool: pool,
    };

    let app = build_router(state, config.allowed_origins());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_cache_store(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Arc<dyn CacheStore>> {
    match config.cache_backend() {
        CacheBackend::Redis => {
            let store = RedisCacheStore::from_url(
                config.redis_url(),
                config.cache_timeout(),
                config.cache_retries(),
            )?;
            tracing::info!(
                timeout_ms = config.cache_timeout().as_millis(),
                retries = config.cache_retries(),
                "using redis cache store"
            );
            Ok(Arc::new(store))
        }
        CacheBackend::Memory => {
            tracing::warn!("using in-memory cache store; revocations do not survive a restart");
            Ok(Arc::new(InMemoryCacheStore::new(clock)))
        }
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
