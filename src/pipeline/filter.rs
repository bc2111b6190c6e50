use chrono::NaiveDate;

use crate::domain::{Dataset, DateRange, Record};

/// Date-range subset of a `Dataset`, still newest first.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    range: Option<DateRange>,
    records: &'a [Record],
}

impl<'a> FilteredView<'a> {
    pub fn range(&self) -> Option<DateRange> {
        self.range
    }

    pub fn records(&self) -> &'a [Record] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent row in the view.
    pub fn latest(&self) -> Option<&'a Record> {
        self.records.first()
    }

    /// Row right before `latest`, if any.
    pub fn previous(&self) -> Option<&'a Record> {
        self.records.get(1)
    }
}

impl Dataset {
    /// Oldest to newest date present, `None` for an empty dataset.
    pub fn span(&self) -> Option<DateRange> {
        let records = self.records();
        match (records.last(), records.first()) {
            (Some(oldest), Some(newest)) => Some(DateRange::new(oldest.date, newest.date)),
            _ => None,
        }
    }

    /// Records whose date lies in `range` (inclusive); `None` selects the
    /// whole span.
    pub fn filter(&self, range: Option<DateRange>) -> FilteredView<'_> {
        let records = self.records();
        let Some(range) = range.or_else(|| self.span()) else {
            return FilteredView { range: None, records: &[] };
        };

        // records are sorted newest first, so both predicates flip exactly once
        let from = records.partition_point(|r| r.date > range.end);
        let to = records.partition_point(|r| r.date >= range.start);
        let selected = if from < to { &records[from..to] } else { &records[..0] };

        FilteredView {
            range: Some(range),
            records: selected,
        }
    }
}

/// Range picked by a user; either end may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewRequest {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ViewRequest {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Concrete range against the dataset span. A missing end is taken from
    /// the span; with an empty dataset only a fully specified range survives.
    pub fn resolve(&self, span: Option<DateRange>) -> Option<DateRange> {
        match (self.start, self.end, span) {
            (Some(start), Some(end), _) => Some(DateRange::new(start, end)),
            (Some(start), None, Some(span)) => Some(DateRange::new(start, span.end)),
            (None, Some(end), Some(span)) => Some(DateRange::new(span.start, end)),
            (None, None, span) => span,
            _ => None,
        }
    }
}
