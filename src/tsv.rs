//! Spreadsheet clipboard text: tab-separated cells, newline-separated rows

use std::borrow::Cow;

/// Replace characters that would break the row/column structure with spaces
pub fn sanitize_cell(text: &str) -> Cow<'_, str> {
    if text.contains(['\t', '\n', '\r']) {
        Cow::Owned(text.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(text)
    }
}

/// Join rows of cell text into clipboard text
///
/// No trailing newline, so a single cell serializes to exactly its text.
pub fn serialize_rows<R, C>(rows: R) -> String
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    let mut output = String::new();
    for (row_num, row) in rows.into_iter().enumerate() {
        if row_num > 0 {
            output.push('\n');
        }
        for (col_num, cell) in row.into_iter().enumerate() {
            if col_num > 0 {
                output.push('\t');
            }
            output.push_str(&sanitize_cell(cell.as_ref()));
        }
    }
    output
}

/// Split clipboard text into rows of cells
///
/// Accepts `\n` and `\r\n` line endings. A single trailing line break (as
/// spreadsheets append when copying) does not produce an extra empty row.
/// Empty text yields no rows.
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);

    if text.is_empty() {
        return Vec::new();
    }

    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            line.split('\t').map(str::to_string).collect()
        })
        .collect()
}
