//! Delimited-document parsing for bulk import.
//!
//! The format is deliberately plain: comma-separated fields, optional double
//! quotes around a field, a mandatory header row naming the columns. Authors
//! within a single field are separated by semicolons.

use crate::domain::imports::{
    errors::ImportsServiceError,
    models::{BookImportRow, CategoryImportRow},
};

/// A parsed row, keyed by the 1-based line number it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowOutcome<T> {
    Ready(T),
    Malformed(String),
}

pub(crate) struct RawTable {
    header: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl RawTable {
    fn column(&self, name: &'static str) -> Result<usize, ImportsServiceError> {
        self.header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(ImportsServiceError::MissingColumn(name))
    }

    fn optional_column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Split a document into header and data rows. Blank lines are skipped.
pub(crate) fn parse_table(text: &str) -> Result<RawTable, ImportsServiceError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(ImportsServiceError::MissingHeader)?;

    let header = split_fields(header_line);

    if header.iter().all(|h| h.is_empty()) {
        return Err(ImportsServiceError::MissingHeader);
    }

    let rows = lines
        .map(|(line_no, line)| (line_no, split_fields(line)))
        .collect();

    Ok(RawTable { header, rows })
}

/// Book rows from a parsed table. Rows missing a required field are dropped
/// from the attempted set; rows with unparseable numbers come back as
/// `Malformed` so the caller can count and report them.
pub(crate) fn book_rows(
    table: &RawTable,
) -> Result<Vec<(usize, RowOutcome<BookImportRow>)>, ImportsServiceError> {
    let title_col = table.column("title")?;
    let authors_col = table.column("authors")?;
    let description_col = table.column("description")?;
    let price_col = table.optional_column("price");
    let stock_col = table.optional_column("stock");

    let mut out = Vec::with_capacity(table.rows.len());

    for (line_no, fields) in &table.rows {
        let title = field(fields, title_col);
        let authors_field = field(fields, authors_col);
        let description = field(fields, description_col);

        // Required-field gating: silently drop, do not count.
        if title.is_empty() || authors_field.is_empty() || description.is_empty() {
            continue;
        }

        let price = match parse_amount(fields, price_col) {
            Ok(value) => value,
            Err(reason) => {
                out.push((*line_no, RowOutcome::Malformed(reason)));
                continue;
            }
        };

        let stock = match parse_amount(fields, stock_col) {
            Ok(value) => value,
            Err(reason) => {
                out.push((*line_no, RowOutcome::Malformed(reason)));
                continue;
            }
        };

        let authors = authors_field
            .split(';')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        out.push((
            *line_no,
            RowOutcome::Ready(BookImportRow {
                title,
                authors,
                description,
                price,
                stock,
            }),
        ));
    }

    Ok(out)
}

/// Category rows from a parsed table.
pub(crate) fn category_rows(
    table: &RawTable,
) -> Result<Vec<(usize, RowOutcome<CategoryImportRow>)>, ImportsServiceError> {
    let name_col = table.column("name")?;
    let description_col = table.optional_column("description");

    let mut out = Vec::with_capacity(table.rows.len());

    for (line_no, fields) in &table.rows {
        let name = field(fields, name_col);

        if name.is_empty() {
            continue;
        }

        let description = description_col.map(|col| field(fields, col)).unwrap_or_default();

        out.push((
            *line_no,
            RowOutcome::Ready(CategoryImportRow { name, description }),
        ));
    }

    Ok(out)
}

fn field(fields: &[String], index: usize) -> String {
    fields.get(index).map(|f| f.trim().to_string()).unwrap_or_default()
}

fn parse_amount(fields: &[String], column: Option<usize>) -> Result<u64, String> {
    let Some(column) = column else {
        return Ok(0);
    };

    let raw = field(fields, column);

    if raw.is_empty() {
        return Ok(0);
    }

    raw.parse::<u64>()
        .map_err(|_| format!("\"{raw}\" is not a non-negative integer"))
}

/// Comma separation with double-quote grouping; `""` inside a quoted field
/// is a literal quote.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            other => current.push(other),
        }
    }

    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_fields_handles_quotes_and_embedded_commas() {
        let fields = split_fields(r#"plain,"has, comma","she said ""hi""""#);

        assert_eq!(
            fields,
            vec![
                "plain".to_string(),
                "has, comma".to_string(),
                r#"she said "hi""#.to_string(),
            ]
        );
    }

    #[test]
    fn empty_document_is_missing_header() {
        let result = parse_table("");

        assert!(
            matches!(result, Err(ImportsServiceError::MissingHeader)),
            "expected MissingHeader, got {result:?}"
        );
    }

    #[test]
    fn missing_required_column_is_reported() {
        let table = parse_table("title,description\nA,B\n").unwrap();

        let result = book_rows(&table);

        assert!(
            matches!(result, Err(ImportsServiceError::MissingColumn("authors"))),
            "expected MissingColumn(authors), got {result:?}"
        );
    }

    #[test]
    fn rows_missing_required_fields_are_dropped_silently() {
        let table = parse_table(
            "title,authors,description,price,stock\n\
             Kept,Someone,Fine,100,1\n\
             ,Someone,No title,100,1\n\
             Dropped Too,,No authors,100,1\n",
        )
        .unwrap();

        let rows = book_rows(&table).unwrap();

        assert_eq!(rows.len(), 1, "gated rows must not enter the attempted set");
        assert!(matches!(rows[0].1, RowOutcome::Ready(_)));
    }

    #[test]
    fn bad_numbers_become_malformed_rows() {
        let table = parse_table(
            "title,authors,description,price,stock\n\
             Odd Pricing,Someone,Fine,not-a-number,1\n",
        )
        .unwrap();

        let rows = book_rows(&table).unwrap();

        assert_eq!(rows.len(), 1);
        assert!(
            matches!(rows[0].1, RowOutcome::Malformed(_)),
            "a bad price is attempted and fails, not gated"
        );
    }

    #[test]
    fn authors_split_on_semicolons() {
        let table = parse_table(
            "title,authors,description\n\
             Joint Work,First Author; Second Author,Fine\n",
        )
        .unwrap();

        let rows = book_rows(&table).unwrap();

        match &rows[0].1 {
            RowOutcome::Ready(row) => {
                assert_eq!(row.authors, vec!["First Author", "Second Author"]);
                assert_eq!(row.price, 0, "absent price column defaults to zero");
            }
            RowOutcome::Malformed(reason) => panic!("expected Ready, got Malformed({reason})"),
        }
    }

    #[test]
    fn category_rows_parse_name_and_description() {
        let table = parse_table("name,description\nHistory,The past\n,missing name\n").unwrap();

        let rows = category_rows(&table).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].1,
            RowOutcome::Ready(CategoryImportRow {
                name: "History".to_string(),
                description: "The past".to_string(),
            })
        );
    }
}
