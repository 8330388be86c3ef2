mod plans;
mod scout;

use clap::{Parser, Subcommand, ValueEnum};

pub use self::{
    plans::{PlansArgs, list},
    scout::{ScoutArgs, scout},
};
use crate::api::catalog::Catalog;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: crunch the usage export and rank the discount plans.
    #[clap(name = "scout")]
    Scout(Box<ScoutArgs>),

    /// List the plan catalog.
    #[clap(name = "plans")]
    Plans(PlansArgs),
}

#[derive(Parser)]
pub struct CatalogArgs {
    /// Plan catalog: JSON file path or `http(s)` URL.
    #[clap(long = "plans", env = "PLANSCOUT_PLANS", default_value = "data/plans.json")]
    pub catalog: Catalog,
}

#[derive(Copy, Clone, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Table,

    /// The full report as JSON.
    Json,
}
