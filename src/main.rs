use anyhow::Context;
use library_rental::{
    adapters::memory::MemoryStore,
    adapters::postgres::{
        PostgresArticleRepository, PostgresMemberRepository, PostgresMembershipRepository,
        PostgresSettingsStore, PostgresTransactionRepository, PostgresUnitOfWorkFactory,
        PostgresUserAccountRepository,
    },
    api::{AppState, create_router},
    application::{ServiceDependencies, account::TokenIssuer, rental::audit_article_statuses},
    config::{AppConfig, LogFormat, LoggingConfig, StorageBackend},
};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn postgres_dependencies(
    config: &AppConfig,
    tokens: TokenIssuer,
) -> anyhow::Result<ServiceDependencies> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(ServiceDependencies {
        members: Arc::new(PostgresMemberRepository::new(pool.clone())),
        memberships: Arc::new(PostgresMembershipRepository::new(pool.clone())),
        articles: Arc::new(PostgresArticleRepository::new(pool.clone())),
        transactions: Arc::new(PostgresTransactionRepository::new(pool.clone())),
        accounts: Arc::new(PostgresUserAccountRepository::new(pool.clone())),
        settings: Arc::new(PostgresSettingsStore::new(
            pool.clone(),
            config.library.fallback_settings(),
        )),
        fallback_settings: config.library.fallback_settings(),
        unit_of_work: Arc::new(PostgresUnitOfWorkFactory::new(pool)),
        tokens,
    })
}

fn memory_dependencies(config: &AppConfig, tokens: TokenIssuer) -> ServiceDependencies {
    let store = Arc::new(MemoryStore::with_fallback(
        config.library.fallback_settings(),
    ));

    ServiceDependencies {
        members: store.clone(),
        memberships: store.clone(),
        articles: store.clone(),
        transactions: store.clone(),
        accounts: store.clone(),
        settings: store.clone(),
        fallback_settings: config.library.fallback_settings(),
        unit_of_work: store,
        tokens,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let tokens = TokenIssuer::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    )
    .context("Invalid token lifetime")?;

    tracing::info!(backend = ?config.storage.backend, "Initializing storage");
    let service_deps = match config.storage.backend {
        StorageBackend::Postgres => postgres_dependencies(&config, tokens).await?,
        StorageBackend::Memory => memory_dependencies(&config, tokens),
    };

    // 起動時に資料状態と台帳の整合性を確認する
    match audit_article_statuses(&service_deps).await {
        Ok(mismatches) if mismatches.is_empty() => {
            tracing::info!("Article statuses agree with the ledger")
        }
        Ok(mismatches) => tracing::warn!(
            count = mismatches.len(),
            "Article statuses disagree with the ledger"
        ),
        Err(e) => tracing::error!(error = %e, "Article status audit failed"),
    }

    let app_state = Arc::new(AppState { service_deps });
    let app = create_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
