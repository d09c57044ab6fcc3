//! Table formatting utilities

use ips_patch::PatchRecord;
use prettytable::{Cell, Row, Table};

use super::format::format_offset;

/// Create a table with bold headers
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).style_spec("b"))
        .collect();
    table.set_titles(Row::new(header_cells));

    table
}

/// Build the record listing shown by `info --records`
pub fn record_table<'a, I>(records: I) -> Table
where
    I: IntoIterator<Item = &'a PatchRecord>,
{
    let mut table = create_table(&["#", "Type", "Offset", "End", "Length", "Data"]);
    for (index, record) in records.into_iter().enumerate() {
        table.add_row(record_row(index, record));
    }
    table
}

fn record_row(index: usize, record: &PatchRecord) -> Row {
    let offset = record.offset().map_or_else(String::new, |o| format_offset(o.into()));
    let end = record
        .end()
        .map_or_else(String::new, |e| format_offset(e as u64));

    Row::new(vec![
        Cell::new(&index.to_string()).style_spec("r"),
        Cell::new(&record.kind().to_string()),
        Cell::new(&offset),
        Cell::new(&end),
        Cell::new(&record.written_len().to_string()).style_spec("r"),
        Cell::new(&data_preview(record)),
    ])
}

/// Short hex view of a record's payload
fn data_preview(record: &PatchRecord) -> String {
    const PREVIEW_BYTES: usize = 8;

    match record {
        PatchRecord::Standard { data, .. } => {
            let mut preview = data
                .iter()
                .take(PREVIEW_BYTES)
                .map(|b| format!("{b:02X}"))
                .collect::<Vec<_>>()
                .join(" ");
            if data.len() > PREVIEW_BYTES {
                preview.push_str(" ...");
            }
            preview
        }
        PatchRecord::RunLength { value, .. } => format!("fill {value:02X}"),
        PatchRecord::EndOfStream => String::new(),
    }
}
