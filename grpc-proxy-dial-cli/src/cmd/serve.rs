//! serve the example gRPC service

use clap::Args;
use grpc_proxy_dial::{
    error::{BoxError, ErrorContext},
    grpc::server::{self, DEFAULT_PORT},
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_graceful::{Shutdown, ShutdownGuard};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Args)]
/// serve the example gRPC service (SayHello)
pub struct CliCommandServe {
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    /// the port to listen on
    port: u16,

    #[arg(long, short = 'i', default_value = "127.0.0.1")]
    /// the interface to listen on
    interface: String,
}

/// run the example gRPC service until ctrl-c is pressed
pub async fn run(cfg: CliCommandServe) -> Result<(), BoxError> {
    let address = format!("{}:{}", cfg.interface, cfg.port);
    tracing::info!("starting grpc example service on: {address}");

    let listener = TcpListener::bind(&address)
        .await
        .inspect_err(|err| tracing::error!("failed to bind {address}: {err}"))
        .with_context(|| format!("bind grpc example service to {address}"))?;

    // a failing server shuts down the process just like ctrl-c would
    let failed = CancellationToken::new();
    let graceful = Shutdown::new({
        let failed = failed.clone();
        async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => (),
                _ = failed.cancelled() => (),
            }
        }
    });

    let server = graceful.spawn_task_fn(async move |guard: ShutdownGuard| {
        let result = server::serve(listener, guard.cancelled()).await;
        if result.is_err() {
            failed.cancel();
        }
        result
    });

    graceful
        .shutdown_with_limit(Duration::from_secs(30))
        .await
        .context("graceful shutdown of grpc example service")?;

    server
        .await
        .context("join grpc example service task")??;
    Ok(())
}
