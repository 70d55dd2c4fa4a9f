use std::{process, sync::Arc};

use ephemera::{
    application::{error::AppError, repos::RecordLookup, resolver::ExpiryResolver},
    cache::{CacheConfig, RenderCacheCoordinator},
    config,
    infra::{
        db::{PostgresRepositories, UnconfiguredLookup},
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let lookup = init_lookup(&settings.database)?;

    let resolver = ExpiryResolver::new(lookup).with_timeout(settings.database.lookup_timeout);
    let cache_config = CacheConfig::from(&settings.cache);
    info!(
        target = "ephemera::serve",
        enabled = cache_config.enabled,
        horizon_secs = cache_config.horizon.whole_seconds(),
        unavailable_horizon_secs = cache_config.unavailable_horizon.whole_seconds(),
        max_entries = cache_config.max_entries,
        "render cache configured"
    );

    let state = HttpState {
        cache: Arc::new(RenderCacheCoordinator::new(cache_config, resolver)),
        render: Arc::new(settings.render.clone()),
    };

    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool = PostgresRepositories::connect(
        database_url,
        settings.database.max_connections.get(),
        settings.database.acquire_timeout,
    )
    .await
    .map_err(InfraError::from)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    info!(target = "ephemera::migrate", "migrations applied");
    Ok(())
}

fn init_lookup(database: &config::DatabaseSettings) -> Result<Arc<dyn RecordLookup>, AppError> {
    let Some(url) = database.url.as_ref() else {
        warn!(
            target = "ephemera::serve",
            "database url is not configured; every key resolves as unavailable"
        );
        return Ok(Arc::new(UnconfiguredLookup));
    };

    let pool = PostgresRepositories::connect_lazy(
        url,
        database.max_connections.get(),
        database.acquire_timeout,
    )
    .map_err(InfraError::from)?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "ephemera::serve",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target = "ephemera::serve", error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target = "ephemera::serve", "shutdown requested");
}
