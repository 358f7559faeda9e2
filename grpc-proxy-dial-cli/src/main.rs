//! entrypoint for grpc-proxy-dial-cli

#![cfg_attr(docsrs, feature(doc_cfg))]

use clap::{Parser, Subcommand};

pub mod cmd;
use self::cmd::{hello, resolve, serve};

pub mod trace;

#[derive(Debug, Parser)]
#[command(name = "grpc-proxy-dial")]
#[command(bin_name = "grpc-proxy-dial")]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    /// log in json format instead of the human readable format
    json: bool,

    #[command(subcommand)]
    cmds: CliCommands,
}

#[derive(Debug, Subcommand)]
enum CliCommands {
    Serve(serve::CliCommandServe),
    Hello(hello::CliCommandHello),
    Resolve(resolve::CliCommandResolve),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = trace::init_tracing(cli.json) {
        eprintln!("🚩 failed to init tracing: {err}");
    }

    #[expect(clippy::exit)]
    if let Err(err) = match cli.cmds {
        CliCommands::Serve(cfg) => serve::run(cfg).await,
        CliCommands::Hello(cfg) => hello::run(cfg).await,
        CliCommands::Resolve(cfg) => resolve::run(cfg),
    } {
        eprintln!("🚩 exit with error: {err}");
        std::process::exit(1);
    }
}
