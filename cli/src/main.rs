//! feedbackd - diagnostics-collection server.
//!
//! Restores a solution's dependencies, loads it through the external
//! compiler host, and serves normalized compile/syntax diagnostics to
//! clients over framed JSON-RPC.
//!
//! ```text
//! main() -> Config::load -> Analyzer<HostEngine> -> RpcServer::serve
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

use feedback_analysis::{Analyzer, BuildOutputFilter, HostEngine, Restorer};
use feedback_rpc::RpcServer;

use crate::config::Config;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `feedbackd [--config <path>]`
fn parse_args() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => bail!("--config requires a path"),
            },
            "--help" | "-h" => {
                println!("usage: feedbackd [--config <path>]");
                std::process::exit(0);
            }
            other => bail!("unrecognized argument: {other}"),
        }
    }
    Ok(config_path)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config_path = parse_args()?;
    let config = Config::load(config_path.as_deref())?;

    let engine = HostEngine::new(&config.engine.command, config.engine.args.clone());
    let restorer = Restorer::new(&config.restore.command, config.restore.args.clone());
    let filter = BuildOutputFilter::new(config.intermediate_dirs.clone());
    let analyzer = Arc::new(Analyzer::new(engine, restorer, filter));

    let server = RpcServer::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "feedbackd listening");
    server.serve(analyzer).await
}
