use grpc_proxy_dial::error::{BoxError, ErrorContext as _};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use std::io::IsTerminal as _;

/// Install the global tracing subscriber, writing to stderr.
///
/// Filter directives are read from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(json: bool) -> Result<(), BoxError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .flatten_event(true),
            )
            .with(filter)
            .try_init()
            .context("try init (json) tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .try_init()
            .context("try init (default) tracing subscriber")?;
    }

    Ok(())
}
