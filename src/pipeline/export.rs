use std::io::Write;

use crate::constants::{EXPORT_HEADER, UTF8_BOM};
use crate::error::ExportError;
use crate::pipeline::filter::FilteredView;
use crate::pipeline::present::TableRow;

/// Encode `view` as a spreadsheet-friendly CSV: UTF-8 with BOM, header
/// `date_str,total_aircraft,enter_adiz,ships`, one line per record.
pub fn export_csv(view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let mut buf: Vec<u8> = Vec::new();
    write_csv(&mut buf, view)?;
    Ok(buf)
}

pub fn write_csv<W: Write>(mut out: W, view: &FilteredView<'_>) -> Result<(), ExportError> {
    out.write_all(UTF8_BOM)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    wtr.write_record(EXPORT_HEADER)?;
    for record in view.records() {
        wtr.serialize(TableRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}
