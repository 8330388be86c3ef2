use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use enumset::EnumSet;

use crate::{
    cli::{CatalogArgs, OutputFormat},
    core::{
        filter::{DateRange, Filters},
        weekday::DayOfWeek,
    },
    prelude::*,
    report::Ranking,
    session::Session,
    tables::{build_hourly_table, build_overview_table, build_ranking_table},
};

#[derive(Parser)]
pub struct ScoutArgs {
    /// Meter usage export.
    #[clap(env = "PLANSCOUT_EXPORT")]
    pub export: PathBuf,

    #[clap(flatten)]
    pub catalog: CatalogArgs,

    /// First day to include. Defaults to the day after the first record.
    #[clap(long, env = "PLANSCOUT_START")]
    pub start: Option<NaiveDate>,

    /// Last day to include. Defaults to the day of the last record.
    #[clap(long, env = "PLANSCOUT_END")]
    pub end: Option<NaiveDate>,

    /// Ignore the default date range and take every record.
    #[clap(long, conflicts_with_all = ["start", "end"])]
    pub all_dates: bool,

    /// Days of week to include, the whole week by default. An empty list excludes everything.
    #[clap(long, env = "PLANSCOUT_DAYS", value_delimiter = ',', num_args = 0..)]
    pub days: Option<Vec<DayOfWeek>>,

    /// Years since signing up, selects the discount tier.
    #[clap(long = "year", env = "PLANSCOUT_YEAR", default_value = "0")]
    pub discount_year: usize,

    #[clap(long, value_enum, env = "PLANSCOUT_FORMAT", default_value = "table")]
    pub format: OutputFormat,
}

impl ScoutArgs {
    /// Apply the explicit options on top of the ingested defaults.
    pub fn filters(&self, defaults: Filters) -> Filters {
        let dates = if self.all_dates {
            DateRange::UNBOUNDED
        } else {
            DateRange {
                start: self.start.or(defaults.dates.start),
                end: self.end.or(defaults.dates.end),
            }
        };
        let weekdays = self
            .days
            .as_ref()
            .map_or(defaults.weekdays, |days| days.iter().copied().collect::<EnumSet<_>>());
        Filters { dates, weekdays, discount_year: self.discount_year }
    }
}

#[instrument(skip_all)]
pub async fn scout(args: &ScoutArgs) -> Result {
    let text = tokio::fs::read_to_string(&args.export)
        .await
        .with_context(|| format!("failed to read `{}`", args.export.display()))?;

    let mut session = Session::new(args.catalog.catalog.clone());
    let defaults = session.ingest(&text)?;
    info!(n_records = session.export().records.len(), "ingested");
    let filters = args.filters(defaults);
    info!(?filters, "filtering…");
    let report = session.report(&filters).await;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!("{}", build_overview_table(&report.header, &report.summary));
            println!("{}", build_hourly_table(&report.hourly));
            match &report.ranking {
                Ranking::Ready { plans } => println!("{}", build_ranking_table(plans)),
                Ranking::Unavailable { reason } => warn!("no plan ranking: {reason}"),
            }
        }
    }

    session.teardown();
    Ok(())
}
