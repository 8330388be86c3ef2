use crate::{
    core::{
        aggregate::Aggregates,
        export::ParsedExport,
        filter::{DateRange, Filters},
    },
    prelude::*,
};

/// Freshly loaded export along with the filters it suggests.
#[must_use]
pub struct Ingested {
    pub export: ParsedExport,
    pub defaults: Filters,
}

/// Parse the export and derive the default filters from its records.
///
/// This is the only place where the defaults are computed.
#[instrument(skip_all)]
pub fn ingest(text: &str) -> Result<Ingested> {
    let export = ParsedExport::parse(text)?;
    let defaults = Filters { dates: DateRange::spanning(&export.records), ..Filters::default() };
    info!(start = ?defaults.dates.start, end = ?defaults.dates.end, "default date range");
    Ok(Ingested { export, defaults })
}

/// Re-aggregate the already parsed export with the caller's filters as is.
pub fn reprocess(export: &ParsedExport, filters: &Filters) -> Aggregates {
    Aggregates::collect(&export.records, filters)
}
