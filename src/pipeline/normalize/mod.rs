//! Raw CSV bytes to a validated, newest-first `Dataset`.
//!
//! Table-level defects (unreadable CSV, no date column) fail the whole load.
//! Row-level defects are recovered locally and accounted for in the
//! `NormalizeReport` returned next to the dataset.

pub mod columns;
pub mod dates;

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::constants::{MAX_YEAR, MIN_YEAR, UTF8_BOM};
use crate::domain::{Dataset, Record};
use crate::error::{LoadError, Result};

pub use columns::{ColumnLayout, Field};
pub use dates::parse_date;

/// What to do with rows reporting more ADIZ incursions than aircraft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdizPolicy {
    /// Keep the source values untouched.
    #[default]
    PassThrough,
    /// Keep the source values and list the date in the report.
    Flag,
    /// Cap `enter_adiz` at `total_aircraft` and list the date in the report.
    Clamp,
}

impl std::str::FromStr for AdizPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass_through" | "passthrough" | "none" => Ok(AdizPolicy::PassThrough),
            "flag" => Ok(AdizPolicy::Flag),
            "clamp" => Ok(AdizPolicy::Clamp),
            other => Err(format!("unknown ADIZ policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub adiz_policy: AdizPolicy,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            adiz_policy: AdizPolicy::PassThrough,
            min_year: MIN_YEAR,
            max_year: MAX_YEAR,
        }
    }
}

/// Why a source row did not make it into the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    UnparseableDate { value: String },
    YearOutOfRange { date: NaiveDate },
    /// A later row carried the same date and replaced this one.
    DuplicateDate { date: NaiveDate },
}

impl RejectReason {
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::UnparseableDate { .. } => "unparseable_date",
            RejectReason::YearOutOfRange { .. } => "year_out_of_range",
            RejectReason::DuplicateDate { .. } => "duplicate_date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    /// 1-based line in the source table (header is line 1).
    pub line: u64,
    pub reason: RejectReason,
}

/// Row-level outcome of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rejections: Vec<RowRejection>,
    pub ignored_columns: Vec<String>,
    /// Numeric fields absent from the source, zero for every row.
    pub defaulted_columns: Vec<String>,
    /// Empty numeric cells replaced by zero.
    pub cells_zero_filled: usize,
    /// Non-numeric, negative or fractional cells replaced by zero.
    pub cells_coerced: usize,
    /// Dates where `enter_adiz > total_aircraft` (only with `flag`/`clamp`).
    pub adiz_exceeds_total: Vec<NaiveDate>,
}

impl NormalizeReport {
    pub fn rows_dropped(&self) -> usize {
        self.rejections.len()
    }

    pub fn dropped_by(&self, label: &str) -> usize {
        self.rejections
            .iter()
            .filter(|r| r.reason.label() == label)
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub dataset: Dataset,
    pub report: NormalizeReport,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn normalize(&self, raw: &[u8]) -> Result<Normalized> {
        let bytes = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        let layout = ColumnLayout::resolve(&headers);
        if !layout.has(Field::Date) {
            return Err(LoadError::MissingDateColumn {
                headers: headers.iter().map(str::to_string).collect(),
            });
        }

        let mut report = NormalizeReport {
            ignored_columns: layout.ignored.clone(),
            defaulted_columns: Field::NUMERIC
                .iter()
                .filter(|f| !layout.has(**f))
                .map(|f| f.name().to_string())
                .collect(),
            ..NormalizeReport::default()
        };

        // (source line, record, enter_adiz exceeded total_aircraft)
        let mut kept: Vec<(u64, Record, bool)> = Vec::new();
        let mut seen: HashMap<NaiveDate, usize> = HashMap::new();

        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            report.rows_read += 1;
            let line = row
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);

            let (record, exceeds) = match self.normalize_row(&layout, &row, &mut report) {
                Ok(row) => row,
                Err(reason) => {
                    debug!(line, reason = reason.label(), "Dropping source row");
                    report.rejections.push(RowRejection { line, reason });
                    continue;
                }
            };

            if let Some(prev) = seen.insert(record.date, kept.len()) {
                let (prev_line, _, _) = kept[prev];
                report.rejections.push(RowRejection {
                    line: prev_line,
                    reason: RejectReason::DuplicateDate { date: record.date },
                });
            }
            kept.push((line, record, exceeds));
        }

        // Only rows that survive deduplication are flagged; `seen` points at them.
        let mut exceeding: Vec<NaiveDate> = seen
            .values()
            .filter(|&&idx| kept[idx].2)
            .map(|&idx| kept[idx].1.date)
            .collect();
        exceeding.sort_unstable_by(|a, b| b.cmp(a));
        report.adiz_exceeds_total = exceeding;

        report.rejections.sort_by_key(|r| r.line);
        let dataset = Dataset::from_records(kept.into_iter().map(|(_, r, _)| r).collect());
        report.rows_kept = dataset.len();

        if report.rows_dropped() > 0 {
            warn!(
                rows_read = report.rows_read,
                rows_kept = report.rows_kept,
                unparseable = report.dropped_by("unparseable_date"),
                out_of_range = report.dropped_by("year_out_of_range"),
                duplicates = report.dropped_by("duplicate_date"),
                "Dropped source rows during normalization"
            );
        }

        Ok(Normalized { dataset, report })
    }

    fn normalize_row(
        &self,
        layout: &ColumnLayout,
        row: &StringRecord,
        report: &mut NormalizeReport,
    ) -> std::result::Result<(Record, bool), RejectReason> {
        let raw_date = layout.cell(row, Field::Date).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| RejectReason::UnparseableDate {
            value: raw_date.to_string(),
        })?;
        if date.year() < self.options.min_year || date.year() > self.options.max_year {
            return Err(RejectReason::YearOutOfRange { date });
        }

        let mut count = |field: Field| -> u32 {
            if !layout.has(field) {
                return 0;
            }
            match layout.cell(row, field) {
                None => {
                    report.cells_zero_filled += 1;
                    0
                }
                Some(cell) => parse_count(cell).unwrap_or_else(|| {
                    report.cells_coerced += 1;
                    0
                }),
            }
        };
        let total_aircraft = count(Field::TotalAircraft);
        let mut enter_adiz = count(Field::EnterAdiz);
        let ships = count(Field::Ships);

        let exceeds = enter_adiz > total_aircraft && self.options.adiz_policy != AdizPolicy::PassThrough;
        if exceeds && self.options.adiz_policy == AdizPolicy::Clamp {
            enter_adiz = total_aircraft;
        }

        Ok((Record::new(date, total_aircraft, enter_adiz, ships), exceeds))
    }
}

/// Non-negative integer count; integral decimals such as `12.0` are accepted.
fn parse_count(cell: &str) -> Option<u32> {
    if let Ok(n) = cell.parse::<u32>() {
        return Some(n);
    }
    let f = cell.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}
