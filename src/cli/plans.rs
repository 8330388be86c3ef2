use clap::Parser;

use crate::{
    api::catalog::PlanSource,
    cli::{CatalogArgs, OutputFormat},
    prelude::*,
    tables::build_catalog_table,
};

#[derive(Parser)]
pub struct PlansArgs {
    #[clap(flatten)]
    pub catalog: CatalogArgs,

    #[clap(long, value_enum, env = "PLANSCOUT_FORMAT", default_value = "table")]
    pub format: OutputFormat,
}

#[instrument(skip_all)]
pub async fn list(args: &PlansArgs) -> Result {
    let plans = args.catalog.catalog.fetch_plans().await?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
        OutputFormat::Table => println!("{}", build_catalog_table(&plans)),
    }
    Ok(())
}
