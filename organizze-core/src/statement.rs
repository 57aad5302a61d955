//! Parse Nubank credit-card statement exports into raw records.
//!
//! Exports are not a stable dialect: the delimiter is sometimes comma and
//! sometimes semicolon, decimal separators come out as either `.` or `,`,
//! and footer/summary rows appear below the data. The parser sniffs the
//! delimiter from the header line and skips anything that does not look
//! like a data row.

/// One statement line before classification.
///
/// `date` is carried through as printed; the import targets a single
/// caller-chosen posting date, so the statement's own dates are never
/// parsed into a calendar type here.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: String,
    pub title: String,
    /// Statement convention: positive for charges, negative for credits.
    pub amount: f64,
}

/// Pick the field delimiter by inspecting the header line only.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.contains(';') { b';' } else { b',' }
}

/// Parse statement text into raw records, in line order.
///
/// Rows with fewer than 3 fields or a non-numeric last field are skipped
/// silently. The amount is taken from the LAST field so exports with
/// extra unnamed columns between title and amount still parse.
pub fn parse_statement(text: &str) -> Vec<RawRecord> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => continue, // skip unreadable rows
        };
        if record.len() < 3 {
            continue;
        }

        let amount_str = record
            .get(record.len() - 1)
            .unwrap_or("")
            .trim()
            .replace(',', ".");
        let amount: f64 = match amount_str.parse() {
            Ok(a) => a,
            Err(_) => continue, // footer/summary row
        };

        records.push(RawRecord {
            date: record.get(0).unwrap_or("").trim().to_string(),
            title: record.get(1).unwrap_or("").trim().to_string(),
            amount,
        });
    }

    records
}
