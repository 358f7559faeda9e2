//! call the SayHello method of the example gRPC service

use clap::Args;
use grpc_proxy_dial::{
    config::ProcessEnv,
    dial::ExplicitStrategyDialer,
    error::{BoxError, ErrorContext},
    grpc::{ClientAdapter, HelloRequest},
};
use std::{io::Write as _, time::Duration};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Args)]
/// call SayHello through the proxy-aware dialer and print the reply
pub struct CliCommandHello {
    /// the target of the grpc server, as host:port or uri
    target: String,

    #[arg(long, short = 'n', default_value = "world")]
    /// the name to greet
    name: String,

    #[arg(long)]
    /// dial using the ambient (default) dialer
    /// instead of the explicit dial strategy
    ///
    /// The ambient dialer ignores NO_PROXY.
    default_dialer: bool,

    #[arg(long, short = 't', default_value_t = 10)]
    /// the connect timeout in seconds
    ///
    /// (0 = no timeout)
    timeout: u64,
}

/// run the hello client
pub async fn run(cfg: CliCommandHello) -> Result<(), BoxError> {
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("ctrl-c received: cancel dial");
                cancel.cancel();
            }
        }
    });

    let mut adapter = ClientAdapter::try_new(&cfg.target)?.with_cancellation(cancel);
    if cfg.timeout > 0 {
        adapter = adapter.with_connect_timeout(Duration::from_secs(cfg.timeout));
    }

    tracing::info!(
        uri = %adapter.uri(),
        default_dialer = cfg.default_dialer,
        "connect to grpc example service",
    );
    let mut client = if cfg.default_dialer {
        adapter.connect_client().await?
    } else {
        adapter
            .with_dialer(ExplicitStrategyDialer::new(ProcessEnv::new()))
            .connect_client()
            .await?
    };

    let response = client
        .say_hello(HelloRequest { name: cfg.name })
        .await
        .context("call SayHello")?;

    writeln!(std::io::stdout().lock(), "{}", response.into_inner().message)
        .context("write reply to stdout")?;
    Ok(())
}
