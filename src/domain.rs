use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of activity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub total_aircraft: u32,
    /// Subset of `total_aircraft` by meaning; the upstream source does not enforce it.
    pub enter_adiz: u32,
    pub ships: u32,
}

impl Record {
    pub fn new(date: NaiveDate, total_aircraft: u32, enter_adiz: u32, ships: u32) -> Self {
        Self {
            date,
            total_aircraft,
            enter_adiz,
            ships,
        }
    }
}

/// Normalized records, newest first, one per date.
///
/// Immutable once built; the only constructor enforces ordering and
/// uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from records in source order. When a date repeats, the
    /// record that appears later in `records` is kept.
    pub fn from_records(mut records: Vec<Record>) -> Self {
        records.reverse();
        // stable sort keeps the later source row first within a date
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.dedup_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

/// Inclusive calendar range; `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range from two picked dates in either order.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
