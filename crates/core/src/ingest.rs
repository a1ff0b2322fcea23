//! CSV upload ingestion.
//!
//! Converts the text of an uploaded CSV file into validated
//! [`CandidateRecord`]s. The format is deliberately simple: the first line is
//! the header row, fields are separated by commas, and there is no quoting,
//! so a value containing a comma shifts every following column.
//!
//! Any structural problem (missing required header, wrong number of columns,
//! missing required value) rejects the whole upload. Column misalignment makes
//! every later field mapping unreliable, so nothing is partially ingested.
//!
//! Row numbers in errors are 1-based and count data lines after the header,
//! blank lines included.

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::types::{CandidateRecord, RequiredField};

/// Headers that must appear in the header row.
pub const REQUIRED_HEADERS: [RequiredField; 4] = [
    RequiredField::Name,
    RequiredField::Category,
    RequiredField::City,
    RequiredField::Phone,
];

/// Structural problems that reject an entire upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// One or more required headers are absent from the header row.
    #[error("Missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    /// A data row has a different number of fields than the header row.
    #[error("Row {row} has incorrect number of columns")]
    ColumnCount {
        row: u64,
        expected: usize,
        found: usize,
    },

    /// A data row left a required field empty.
    #[error("Row {row} is missing required fields")]
    MissingFields {
        row: u64,
        fields: Vec<RequiredField>,
    },

    /// The reader could not decode the input.
    #[error("Failed to parse CSV file: {0}")]
    Malformed(String),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Parse and validate uploaded CSV text.
///
/// Returns one record per non-blank data row, in source order. Duplicate
/// `(name, city)` pairs are kept; deciding between create and update is the
/// reconciler's job.
///
/// # Errors
///
/// Returns the first [`IngestError`] encountered. No records are returned
/// when any row fails.
///
/// # Example
///
/// ```
/// use local_directory_core::ingest;
///
/// let csv = "Business Name,Category,City,Phone\nAcme Plumbing,Plumbers,Aurora IL,6305551234\n";
/// let records = ingest(csv).unwrap();
/// assert_eq!(records[0].city, "aurora-il");
/// assert_eq!(records[0].category, "plumbers");
/// ```
pub fn ingest(text: &str) -> Result<Vec<CandidateRecord>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();

    // The header must be the very first line; the reader skips blank lines,
    // so a later line is never promoted to header.
    let headers: Vec<String> = match rows.next().transpose()? {
        Some(record) if line_of(&record) == 1 => record.iter().map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .map(|field| field.header())
        .filter(|header| !headers.iter().any(|h| h == header))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingHeaders(missing));
    }

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        if is_blank(&row) {
            continue;
        }

        let row_index = line_of(&row).saturating_sub(1);
        if row.len() != headers.len() {
            return Err(IngestError::ColumnCount {
                row: row_index,
                expected: headers.len(),
                found: row.len(),
            });
        }

        let record = map_row(&headers, &row);
        let fields = record.missing_fields();
        if !fields.is_empty() {
            return Err(IngestError::MissingFields {
                row: row_index,
                fields,
            });
        }

        records.push(record);
    }

    Ok(records)
}

/// Normalize a city cell into a locality key: lowercase, whitespace runs
/// replaced by single hyphens.
///
/// ```
/// use local_directory_core::ingest::normalize_city;
///
/// assert_eq!(normalize_city("Aurora  IL"), "aurora-il");
/// ```
#[must_use]
pub fn normalize_city(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn map_row(headers: &[String], row: &StringRecord) -> CandidateRecord {
    let mut record = CandidateRecord::default();

    for (header, value) in headers.iter().zip(row.iter()) {
        match header.as_str() {
            "Business Name" => record.name = value.to_string(),
            "Category" => record.category = value.to_lowercase(),
            "City" => record.city = normalize_city(value),
            "Phone" => record.phone = value.to_string(),
            "Email" => record.email = non_empty(value),
            "Website" => record.website = non_empty(value),
            "Address" => record.address = non_empty(value),
            "Zip" => record.zip = non_empty(value),
            "Description" => record.description = non_empty(value),
            "IsFeatured" => record.is_featured = value.eq_ignore_ascii_case("true") || value == "1",
            _ => {}
        }
    }

    record
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(str::is_empty) && row.len() <= 1
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, csv::Position::line)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const HEADER: &str = "Business Name,Category,City,Phone";

    #[test]
    fn test_one_record_per_row_in_order() {
        let csv = format!(
            "{HEADER}\nAcme Plumbing,plumbers,aurora-il,6305551234\n\
             Cool Air HVAC,hvac,aurora-il,6305552345\n\
             Aurora Roofing,roofers,naperville-il,6305553456\n"
        );
        let records = ingest(&csv).unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Acme Plumbing", "Cool Air HVAC", "Aurora Roofing"]);
    }

    #[test]
    fn test_missing_phone_header_named() {
        let err = ingest("Business Name,Category,City\nAcme,plumbers,aurora-il").unwrap_err();
        assert_eq!(err, IngestError::MissingHeaders(vec!["Phone".to_string()]));
        assert_eq!(err.to_string(), "Missing required headers: Phone");
    }

    #[test]
    fn test_empty_input_misses_every_header() {
        let err = ingest("").unwrap_err();
        assert_eq!(
            err,
            IngestError::MissingHeaders(vec![
                "Business Name".to_string(),
                "Category".to_string(),
                "City".to_string(),
                "Phone".to_string(),
            ])
        );
    }

    #[test]
    fn test_header_not_on_first_line_is_missing() {
        let csv = format!("\n{HEADER}\nAcme,plumbers,aurora-il,6305551234");
        assert!(matches!(
            ingest(&csv),
            Err(IngestError::MissingHeaders(missing)) if missing.len() == 4
        ));
    }

    #[test]
    fn test_short_row_fails_whole_batch() {
        let csv = format!(
            "{HEADER}\nAcme Plumbing,plumbers,aurora-il,6305551234\n\
             Cool Air HVAC,hvac,aurora-il\n\
             Aurora Roofing,roofers,aurora-il,6305553456\n"
        );
        let err = ingest(&csv).unwrap_err();

        assert_eq!(
            err,
            IngestError::ColumnCount {
                row: 2,
                expected: 4,
                found: 3
            }
        );
        assert_eq!(err.to_string(), "Row 2 has incorrect number of columns");
    }

    #[test]
    fn test_embedded_comma_misaligns_columns() {
        let csv = format!("{HEADER}\n\"Smith, Jones & Co\",notaries,aurora-il,6305550000");
        assert!(matches!(
            ingest(&csv),
            Err(IngestError::ColumnCount { row: 1, found: 5, .. })
        ));
    }

    #[test]
    fn test_blank_rows_skipped_but_counted() {
        let csv = format!(
            "{HEADER}\n\n   \nAcme Plumbing,plumbers,aurora-il\n"
        );
        // Blank lines 1 and 2 are skipped; the short row is row 3.
        assert!(matches!(
            ingest(&csv),
            Err(IngestError::ColumnCount { row: 3, .. })
        ));
    }

    #[test]
    fn test_blank_rows_produce_no_records() {
        let csv = format!("{HEADER}\n\nAcme,plumbers,aurora-il,6305551234\n  \n\n");
        assert_eq!(ingest(&csv).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_required_value_fails() {
        let csv = format!("{HEADER}\nAcme Plumbing,plumbers,aurora-il,6305551234\nNo Phone,hvac,aurora-il,\n");
        let err = ingest(&csv).unwrap_err();

        assert_eq!(
            err,
            IngestError::MissingFields {
                row: 2,
                fields: vec![RequiredField::Phone]
            }
        );
        assert_eq!(err.to_string(), "Row 2 is missing required fields");
    }

    #[test]
    fn test_category_and_city_normalized() {
        let csv = format!("{HEADER}\nAcme, Plumbers , Aurora   IL ,630-555-1234");
        let record = &ingest(&csv).unwrap()[0];

        assert_eq!(record.category, "plumbers");
        assert_eq!(record.city, "aurora-il");
        assert_eq!(record.phone, "630-555-1234");
    }

    #[test]
    fn test_optional_columns_mapped() {
        let csv = "Business Name,Category,City,Phone,Email,Website,Address,Zip,Description,IsFeatured\n\
                   Acme,plumbers,aurora-il,6305551234,info@acme.com,acme.com,,60505,24/7 repairs,TRUE\n";
        let record = &ingest(csv).unwrap()[0];

        assert_eq!(record.email.as_deref(), Some("info@acme.com"));
        assert_eq!(record.website.as_deref(), Some("acme.com"));
        assert_eq!(record.address, None);
        assert_eq!(record.zip.as_deref(), Some("60505"));
        assert_eq!(record.description.as_deref(), Some("24/7 repairs"));
        assert!(record.is_featured);
    }

    #[test]
    fn test_is_featured_values() {
        let csv = format!(
            "{HEADER},IsFeatured\nA,x,y,1,1\nB,x,y,1,true\nC,x,y,1,yes\nD,x,y,1,0\nE,x,y,1,"
        );
        let flags: Vec<bool> = ingest(&csv).unwrap().iter().map(|r| r.is_featured).collect();
        assert_eq!(flags, [true, true, false, false, false]);
    }

    #[test]
    fn test_is_featured_defaults_false_without_header() {
        let csv = format!("{HEADER}\nAcme,plumbers,aurora-il,6305551234");
        assert!(!ingest(&csv).unwrap()[0].is_featured);
    }

    #[test]
    fn test_unknown_headers_ignored_and_order_free() {
        let csv = "Phone,Notes,City,Business Name,Category\n6305551234,call first,Aurora IL,Acme,HVAC";
        let record = &ingest(csv).unwrap()[0];

        assert_eq!(record.name, "Acme");
        assert_eq!(record.category, "hvac");
        assert_eq!(record.phone, "6305551234");
    }

    #[test]
    fn test_duplicates_retained() {
        let csv = format!("{HEADER}\nAcme,plumbers,aurora-il,1\nAcme,plumbers,aurora-il,2");
        let records = ingest(&csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].phone, "2");
    }

    #[test]
    fn test_crlf_line_endings() {
        let csv = format!("{HEADER}\r\nAcme,plumbers,aurora-il,6305551234\r\n");
        let records = ingest(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phone, "6305551234");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(ingest(HEADER).unwrap().is_empty());
    }
}
