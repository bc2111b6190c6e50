use csv::StringRecord;

use crate::constants::*;

/// Canonical column a source label feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    TotalAircraft,
    EnterAdiz,
    Ships,
}

impl Field {
    pub const NUMERIC: [Field; 3] = [Field::TotalAircraft, Field::EnterAdiz, Field::Ships];

    pub fn name(self) -> &'static str {
        match self {
            Field::Date => DATE_FIELD,
            Field::TotalAircraft => TOTAL_AIRCRAFT_FIELD,
            Field::EnterAdiz => ENTER_ADIZ_FIELD,
            Field::Ships => SHIPS_FIELD,
        }
    }
}

/// Known labels in precedence order (later entries win).
const LABEL_MAP: &[(&str, Field)] = &[
    (DATE_LABEL_ZH, Field::Date),
    (DATE_FIELD, Field::Date),
    (EXPORT_DATE_LABEL, Field::Date),
    (TOTAL_AIRCRAFT_LABEL_ZH, Field::TotalAircraft),
    (TOTAL_AIRCRAFT_FIELD, Field::TotalAircraft),
    (SHIPS_LABEL_ZH, Field::Ships),
    (SHIPS_FIELD, Field::Ships),
    (ENTER_ADIZ_LABEL_TYPO_ZH, Field::EnterAdiz),
    (ENTER_ADIZ_LABEL_ZH, Field::EnterAdiz),
    (ENTER_ADIZ_FIELD, Field::EnterAdiz),
];

pub fn field_for_label(label: &str) -> Option<Field> {
    LABEL_MAP
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, field)| *field)
}

fn precedence(label: &str) -> usize {
    LABEL_MAP
        .iter()
        .position(|(known, _)| *known == label)
        .unwrap_or(usize::MAX)
}

/// Resolved positions of every canonical field within one header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    date: Vec<usize>,
    total_aircraft: Vec<usize>,
    enter_adiz: Vec<usize>,
    ships: Vec<usize>,
    /// Header labels that map to nothing.
    pub ignored: Vec<String>,
}

impl ColumnLayout {
    pub fn resolve(headers: &StringRecord) -> Self {
        let mut layout = ColumnLayout::default();
        let mut mapped: Vec<(usize, &str, Field)> = Vec::new();

        for (idx, raw) in headers.iter().enumerate() {
            let label = raw.trim();
            match field_for_label(label) {
                Some(field) => mapped.push((idx, label, field)),
                None => layout.ignored.push(label.to_string()),
            }
        }

        // Columns are read in precedence order so the winning label is applied last
        mapped.sort_by_key(|(idx, label, _)| (precedence(label), *idx));
        for (idx, _, field) in mapped {
            layout.columns_mut(field).push(idx);
        }
        layout
    }

    pub fn columns(&self, field: Field) -> &[usize] {
        match field {
            Field::Date => &self.date,
            Field::TotalAircraft => &self.total_aircraft,
            Field::EnterAdiz => &self.enter_adiz,
            Field::Ships => &self.ships,
        }
    }

    fn columns_mut(&mut self, field: Field) -> &mut Vec<usize> {
        match field {
            Field::Date => &mut self.date,
            Field::TotalAircraft => &mut self.total_aircraft,
            Field::EnterAdiz => &mut self.enter_adiz,
            Field::Ships => &mut self.ships,
        }
    }

    pub fn has(&self, field: Field) -> bool {
        !self.columns(field).is_empty()
    }

    /// Cell for `field` in `row`: the last non-empty cell among its columns.
    pub fn cell<'r>(&self, row: &'r StringRecord, field: Field) -> Option<&'r str> {
        self.columns(field)
            .iter()
            .filter_map(|&idx| row.get(idx))
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_upstream_and_canonical_labels() {
        assert_eq!(field_for_label("日期"), Some(Field::Date));
        assert_eq!(field_for_label("date_str"), Some(Field::Date));
        assert_eq!(field_for_label("共機架次"), Some(Field::TotalAircraft));
        assert_eq!(field_for_label("共艦架次"), Some(Field::Ships));
        assert_eq!(field_for_label("進入AIDZ共機架次"), Some(Field::EnterAdiz));
        assert_eq!(field_for_label("進入ADIZ共機架次"), Some(Field::EnterAdiz));
        assert_eq!(field_for_label("備註"), None);
    }

    #[test]
    fn corrected_adiz_label_wins_over_typo() {
        // corrected spelling first in the file, typo second
        let headers = StringRecord::from(vec!["日期", "進入ADIZ共機架次", "進入AIDZ共機架次"]);
        let layout = ColumnLayout::resolve(&headers);
        let row = StringRecord::from(vec!["2024/1/2", "7", "3"]);
        assert_eq!(layout.cell(&row, Field::EnterAdiz), Some("7"));
    }

    #[test]
    fn typo_fills_in_when_corrected_cell_is_empty() {
        let headers = StringRecord::from(vec!["日期", "進入AIDZ共機架次", "進入ADIZ共機架次"]);
        let layout = ColumnLayout::resolve(&headers);
        let row = StringRecord::from(vec!["2024/1/2", "3", ""]);
        assert_eq!(layout.cell(&row, Field::EnterAdiz), Some("3"));
    }

    #[test]
    fn unknown_headers_are_listed_as_ignored() {
        let headers = StringRecord::from(vec!["日期", " 備註 ", "共機架次"]);
        let layout = ColumnLayout::resolve(&headers);
        assert_eq!(layout.ignored, vec!["備註".to_string()]);
        assert!(layout.has(Field::Date));
        assert!(layout.has(Field::TotalAircraft));
        assert!(!layout.has(Field::Ships));
    }
}
