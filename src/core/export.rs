//! Meter usage export: a fixed header block followed by `date,time,value` rows.

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::{core::hours::HOURS_PER_DAY, prelude::*, quantity::energy::KilowattHours};

/// Number of lines preceding the usage rows.
pub const N_HEADER_LINES: usize = 12;

const CUSTOMER_LINE_INDEX: usize = 3;
const METER_LINE_INDEX: usize = 7;

#[must_use]
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct HeaderInfo {
    pub customer_name: String,
    pub customer_address: String,
    pub meter_type: String,
    pub meter_number: String,
}

impl HeaderInfo {
    fn parse(lines: &[&str]) -> Result<Self> {
        ensure!(
            lines.len() >= N_HEADER_LINES,
            "malformed header: expected at least {N_HEADER_LINES} lines, got {}",
            lines.len(),
        );
        let (customer_name, customer_address) = leading_pair(lines[CUSTOMER_LINE_INDEX])
            .context("malformed header: missing the customer name and address")?;
        let (meter_type, meter_number) = leading_pair(lines[METER_LINE_INDEX])
            .context("malformed header: missing the meter type and number")?;
        Ok(Self { customer_name, customer_address, meter_type, meter_number })
    }
}

/// Single usage row.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UsageRecord {
    pub date: NaiveDate,

    /// Hour of day, `0..24`.
    pub hour: u8,

    /// `None` when the value is not a number.
    pub consumption: Option<KilowattHours>,
}

impl UsageRecord {
    fn parse(date: &str, time: &str, value: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(date, "%d/%m/%Y")
            .with_context(|| format!("invalid date `{date}`"))?;
        let hour = time.split(':').next().unwrap_or(time);
        let hour = hour.parse::<u8>().with_context(|| format!("invalid hour `{hour}`"))?;
        ensure!(hour < HOURS_PER_DAY, "hour `{hour}` is out of range");
        Ok(Self { date, hour, consumption: parse_consumption(value) })
    }
}

/// Unfiltered overview of the whole export.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UsageSummary {
    /// Date of the first row, as spelled in the export.
    pub first_date: Option<String>,

    /// Date of the last row, as spelled in the export.
    pub last_date: Option<String>,

    #[serde(rename = "total_kwh")]
    pub total: KilowattHours,
}

impl UsageSummary {
    fn track(&mut self, date: &str, value: &str) {
        if !date.is_empty() {
            if self.first_date.is_none() {
                self.first_date = Some(date.to_string());
            }
            self.last_date = Some(date.to_string());
        }
        if let Some(consumption) = parse_consumption(value) {
            self.total += consumption;
        }
    }
}

#[must_use]
#[derive(Clone, Debug, Default)]
pub struct ParsedExport {
    pub header: HeaderInfo,
    pub records: Vec<UsageRecord>,
    pub summary: UsageSummary,
}

impl ParsedExport {
    /// Parse the export text.
    ///
    /// Blank text is an empty export. Rows with fewer than three fields are skipped,
    /// as well as rows with an empty or unparseable date or time.
    #[instrument(skip_all)]
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            warn!("the export is empty");
            return Ok(Self::default());
        }

        info!("parsing the export…");
        let lines = text.lines().collect_vec();
        let header = HeaderInfo::parse(&lines)?;

        let mut summary = UsageSummary::default();
        let mut records = Vec::with_capacity(lines.len() - N_HEADER_LINES);
        for (index, line) in lines.iter().enumerate().skip(N_HEADER_LINES) {
            let fields = split_fields(line).collect_vec();
            let [date, time, value, ..] = fields.as_slice() else {
                trace!(line = index + 1, "skipped a malformed row");
                continue;
            };
            summary.track(date, value);
            if date.is_empty() || time.is_empty() || value.is_empty() {
                trace!(line = index + 1, "skipped an incomplete row");
                continue;
            }
            match UsageRecord::parse(date, time, value) {
                Ok(record) => records.push(record),
                Err(error) => debug!(line = index + 1, "skipped the row: {error:#}"),
            }
        }

        info!(n_records = records.len(), total = ?summary.total, "parsed");
        Ok(Self { header, records, summary })
    }
}

/// Split the line by commas, trimming whitespace and the quotes around each field.
fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|field| field.trim().trim_matches('"').trim())
}

fn leading_pair(line: &str) -> Option<(String, String)> {
    let mut fields = split_fields(line);
    Some((fields.next()?.to_string(), fields.next()?.to_string()))
}

fn parse_consumption(value: &str) -> Option<KilowattHours> {
    value.parse::<f64>().ok().filter(|value| value.is_finite()).map(KilowattHours)
}
