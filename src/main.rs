mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod report;
mod session;
mod tables;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Scout(args) => cli::scout(&args).await?,
        Command::Plans(args) => cli::list(&args).await?,
    }

    info!("done!");
    Ok(())
}
