//! print the dial decision for an address

use clap::Args;
use grpc_proxy_dial::{
    Address,
    config::ProcessEnv,
    dial::DialStrategy,
    error::{BoxError, ErrorContext},
};
use std::io::Write as _;

#[derive(Debug, Args)]
/// print, as json, how an address would be dialed given the current environment
pub struct CliCommandResolve {
    /// the address to resolve, as host:port
    address: Address,
}

/// run the resolve command
pub fn run(cfg: CliCommandResolve) -> Result<(), BoxError> {
    let decision = DialStrategy::new(ProcessEnv::new()).decide(&cfg.address)?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &decision).context("serialize dial decision")?;
    writeln!(stdout).context("write to stdout")?;
    Ok(())
}
