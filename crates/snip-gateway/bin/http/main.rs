mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use snip_core::{AccessLogRepository, LinkRepository};
use snip_gateway::{App, AppState};
use snip_generator::HashGenerator;
use snip_storage::{InMemoryRepository, MySqlRepository, MySqlSettings};
use snip_telemetry::TelemetryConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let telemetry = TelemetryConfig::builder()
        .log_format(config.log_format)
        .otlp_endpoint(config.otlp_endpoint.clone())
        .build();
    let _guard = snip_telemetry::init(telemetry)?;

    let generator = HashGenerator::with_length(config.code_length)?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        code_length = generator.length(),
        "starting snip server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(&config, Arc::new(InMemoryRepository::new()), generator).await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .clone()
                .context("mysql dsn is required when storage backend is mysql")?;
            let settings = MySqlSettings::builder()
                .database_url(mysql_dsn)
                .acquire_timeout(Duration::from_secs(config.mysql_acquire_timeout_secs))
                .build();
            let repository = MySqlRepository::connect_with(settings).await?;
            repository.bootstrap().await?;
            run_server(&config, Arc::new(repository), generator).await?;
        }
    }

    Ok(())
}

async fn run_server<S>(config: &CLI, store: Arc<S>, generator: HashGenerator) -> anyhow::Result<()>
where
    S: LinkRepository + AccessLogRepository,
{
    let state = AppState::from_store(store, generator, config.max_salt_attempts, &config.base_url)
        .with_trust_forwarded_for(config.trust_forwarded_for);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        App::router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
