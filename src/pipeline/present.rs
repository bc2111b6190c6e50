use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::{ENTER_ADIZ_FIELD, SHIPS_FIELD, TOTAL_AIRCRAFT_FIELD};
use crate::domain::Record;
use crate::pipeline::filter::FilteredView;

/// The three daily counts shown as headline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    TotalAircraft,
    EnterAdiz,
    Ships,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::TotalAircraft, Measure::EnterAdiz, Measure::Ships];

    pub fn key(self) -> &'static str {
        match self {
            Measure::TotalAircraft => TOTAL_AIRCRAFT_FIELD,
            Measure::EnterAdiz => ENTER_ADIZ_FIELD,
            Measure::Ships => SHIPS_FIELD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::TotalAircraft => "PLA aircraft detected (sorties)",
            Measure::EnterAdiz => "Crossed median line / entered ADIZ",
            Measure::Ships => "PLA vessels",
        }
    }

    pub fn value(self, record: &Record) -> u32 {
        match self {
            Measure::TotalAircraft => record.total_aircraft,
            Measure::EnterAdiz => record.enter_adiz,
            Measure::Ships => record.ships,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub measure: Measure,
    pub label: &'static str,
    /// Count on the latest day, absent when the view is empty.
    pub value: Option<u32>,
    /// Latest minus previous day; zero without a previous day.
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub as_of: Option<NaiveDate>,
    pub row_count: usize,
    pub metrics: Vec<Metric>,
}

impl Summary {
    pub fn metric(&self, measure: Measure) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.measure == measure)
    }
}

/// Headline metrics of the most recent day in `view` with day-over-day deltas.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let latest = view.latest();
    let previous = view.previous();

    let metrics = Measure::ALL
        .iter()
        .map(|&measure| {
            let value = latest.map(|r| measure.value(r));
            let delta = match (latest, previous) {
                (Some(l), Some(p)) => i64::from(measure.value(l)) - i64::from(measure.value(p)),
                _ => 0,
            };
            Metric {
                measure,
                label: measure.label(),
                value,
                delta,
            }
        })
        .collect();

    Summary {
        as_of: latest.map(|r| r.date),
        row_count: view.len(),
        metrics,
    }
}

/// Parallel series keyed by date for a time-series chart; same order as the
/// view, no gap filling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub dates: Vec<NaiveDate>,
    pub total_aircraft: Vec<u32>,
    pub enter_adiz: Vec<u32>,
    pub ships: Vec<u32>,
}

impl ChartSeries {
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        let mut series = ChartSeries::default();
        for r in view.records() {
            series.dates.push(r.date);
            series.total_aircraft.push(r.total_aircraft);
            series.enter_adiz.push(r.enter_adiz);
            series.ships.push(r.ships);
        }
        series
    }
}

/// Table/export row. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub date_str: String,
    pub total_aircraft: u32,
    pub enter_adiz: u32,
    pub ships: u32,
}

impl From<&Record> for TableRow {
    fn from(r: &Record) -> Self {
        Self {
            date_str: r.date.format("%Y-%m-%d").to_string(),
            total_aircraft: r.total_aircraft,
            enter_adiz: r.enter_adiz,
            ships: r.ships,
        }
    }
}

pub fn table_rows(view: &FilteredView<'_>) -> Vec<TableRow> {
    view.records().iter().map(TableRow::from).collect()
}
