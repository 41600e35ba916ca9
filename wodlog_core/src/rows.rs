//! Reading of performance exports.
//!
//! The export is a 19-column CSV with a header line. Rows that cannot be
//! used are reported as [`RowError`]s and skipped; the scan always runs to
//! the end of the input. Only an unreadable input stream is an `Err`.

use crate::types::{ComponentType, PerformanceRow, ResultType, RowError};
use crate::Result;
use csv::{ErrorKind, ReaderBuilder, StringRecord};
use std::io::Read;

/// Number of columns in a performance export
pub const EXPECTED_COLUMNS: usize = 19;

/// Column indices, in export order
mod col {
    pub const CUSTOMER_NAME: usize = 0;
    pub const LOCATION_NAME: usize = 1;
    pub const DATE: usize = 2;
    pub const PROGRAM_NAME: usize = 3;
    pub const CLASS_NAME: usize = 4;
    pub const COMPONENT_TYPE: usize = 5;
    pub const COMPONENT_ID: usize = 6;
    pub const COMPONENT_NAME: usize = 7;
    pub const COMPONENT_DESCRIPTION: usize = 8;
    pub const RESULT_TYPE: usize = 9;
    pub const REP_SCHEME: usize = 10;
    pub const FORMATTED_RESULT: usize = 11;
    pub const FROM_WEIGHTLIFTING_TOTAL: usize = 12;
    pub const FROM_VARIABLE_SET: usize = 13;
    pub const IS_RX: usize = 14;
    pub const IS_RX_PLUS: usize = 15;
    pub const IS_PERSONAL_RECORD: usize = 16;
    pub const PERSONAL_RECORD_DESCRIPTION: usize = 17;
    pub const COMMENT: usize = 18;
}

/// Rows and row-level errors from one pass over an export
#[derive(Clone, Debug, Default)]
pub struct ParsedRows {
    pub rows: Vec<PerformanceRow>,
    pub errors: Vec<RowError>,
}

/// Parse a performance export
///
/// - A header with the wrong column count yields one error at row 0 and no rows.
/// - Malformed and short lines become row errors.
/// - Lines with an empty date are separators and are skipped silently.
/// - Lines missing a component type or name become row errors.
///
/// Data rows are numbered from 1; the header is row 0.
pub fn parse_rows<R: Read>(input: R) -> Result<ParsedRows> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut parsed = ParsedRows::default();
    let mut records = reader.records();

    match records.next() {
        None => {
            parsed
                .errors
                .push(RowError::new(0, "Failed to read header: input is empty"));
            return Ok(parsed);
        }
        Some(Err(e)) => {
            if matches!(e.kind(), ErrorKind::Io(_)) {
                return Err(e.into());
            }
            parsed
                .errors
                .push(RowError::new(0, format!("Failed to read header: {}", e)));
            return Ok(parsed);
        }
        Some(Ok(header)) => {
            if header.len() != EXPECTED_COLUMNS {
                tracing::warn!(
                    "Rejecting export: header has {} columns, expected {}",
                    header.len(),
                    EXPECTED_COLUMNS
                );
                parsed.errors.push(
                    RowError::new(
                        0,
                        format!(
                            "Invalid header: expected {} columns, got {}",
                            EXPECTED_COLUMNS,
                            header.len()
                        ),
                    )
                    .with_field("columns", header.len().to_string()),
                );
                return Ok(parsed);
            }
        }
    }

    for (index, result) in records.enumerate() {
        let row_num = index + 1;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                if matches!(e.kind(), ErrorKind::Io(_)) {
                    return Err(e.into());
                }
                tracing::warn!("Skipping malformed row {}: {}", row_num, e);
                parsed
                    .errors
                    .push(RowError::new(row_num, format!("Failed to parse row: {}", e)));
                continue;
            }
        };

        if record.len() < EXPECTED_COLUMNS {
            tracing::warn!(
                "Skipping row {}: {} columns, expected {}",
                row_num,
                record.len(),
                EXPECTED_COLUMNS
            );
            parsed.errors.push(
                RowError::new(
                    row_num,
                    format!(
                        "Row has {} columns, expected {}",
                        record.len(),
                        EXPECTED_COLUMNS
                    ),
                )
                .with_field("columns", record.len().to_string()),
            );
            continue;
        }

        let row = row_from_record(&record);

        if row.date.trim().is_empty() {
            tracing::debug!("Skipping separator row {}", row_num);
            continue;
        }

        if row.component_type.as_str().is_empty() || row.component_name.is_empty() {
            let (field, value) = if row.component_name.is_empty() {
                ("ComponentName", row.component_name.clone())
            } else {
                ("ComponentType", row.component_type.to_string())
            };
            parsed.errors.push(
                RowError::new(row_num, "Missing component type or name").with_field(field, value),
            );
            continue;
        }

        parsed.rows.push(row);
    }

    tracing::info!(
        "Parsed {} rows ({} errors) from export",
        parsed.rows.len(),
        parsed.errors.len()
    );

    Ok(parsed)
}

fn field(record: &StringRecord, i: usize) -> String {
    record.get(i).unwrap_or_default().trim_start().to_string()
}

/// Only an exact, case-insensitive `TRUE` counts as true
fn flag(record: &StringRecord, i: usize) -> bool {
    record
        .get(i)
        .map(|s| s.trim().eq_ignore_ascii_case("TRUE"))
        .unwrap_or(false)
}

fn row_from_record(record: &StringRecord) -> PerformanceRow {
    PerformanceRow {
        customer_name: field(record, col::CUSTOMER_NAME),
        location_name: field(record, col::LOCATION_NAME),
        date: field(record, col::DATE),
        program_name: field(record, col::PROGRAM_NAME),
        class_name: field(record, col::CLASS_NAME),
        component_type: ComponentType::from(field(record, col::COMPONENT_TYPE)),
        component_id: field(record, col::COMPONENT_ID),
        component_name: field(record, col::COMPONENT_NAME),
        component_description: field(record, col::COMPONENT_DESCRIPTION),
        result_type: ResultType::from(field(record, col::RESULT_TYPE)),
        rep_scheme: field(record, col::REP_SCHEME),
        formatted_result: field(record, col::FORMATTED_RESULT),
        from_weightlifting_total: flag(record, col::FROM_WEIGHTLIFTING_TOTAL),
        from_variable_set: flag(record, col::FROM_VARIABLE_SET),
        is_rx: flag(record, col::IS_RX),
        is_rx_plus: flag(record, col::IS_RX_PLUS),
        is_personal_record: flag(record, col::IS_PERSONAL_RECORD),
        personal_record_description: field(record, col::PERSONAL_RECORD_DESCRIPTION),
        comment: field(record, col::COMMENT),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const HEADER: &str = "Customer Name,Location Name,Date,Program Name,Class Name,Component Type,Component ID,Component Name,Component Description,Performance Result Type,Rep Scheme,Fully Formatted Result,From Weightlifting Total,From Variable Set,Is Rx,Is Rx Plus,Is Personal Record,Personal Record Description,Comment";

    /// Build one 19-column export line
    pub(crate) fn line(
        date: &str,
        component_type: &str,
        name: &str,
        result_type: &str,
        result: &str,
        is_pr: bool,
    ) -> String {
        format!(
            "Jane Doe,Main Gym,{date},CrossFit,5:30 PM,{component_type},1001,{name},\"desc, with comma\",{result_type},,{result},FALSE,FALSE,TRUE,FALSE,{pr},,",
            pr = if is_pr { "TRUE" } else { "FALSE" },
        )
    }

    pub(crate) fn export(lines: &[String]) -> String {
        let mut out = String::from(HEADER);
        for l in lines {
            out.push('\n');
            out.push_str(l);
        }
        out.push('\n');
        out
    }

    #[test]
    fn test_parse_valid_rows() {
        let data = export(&[
            line("01/05/2024", "Weightlifting", "Back Squat", "Weight", "1 x 5 @ 135 lbs", true),
            line("01/05/2024", "Metcon", "Fran", "Time", "5:30", false),
        ]);

        let parsed = parse_rows(data.as_bytes()).unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 2);

        let squat = &parsed.rows[0];
        assert_eq!(squat.date, "01/05/2024");
        assert_eq!(squat.component_type, ComponentType::Weightlifting);
        assert_eq!(squat.component_name, "Back Squat");
        assert_eq!(squat.component_description, "desc, with comma");
        assert_eq!(squat.result_type, ResultType::Weight);
        assert_eq!(squat.formatted_result, "1 x 5 @ 135 lbs");
        assert!(squat.is_rx);
        assert!(!squat.is_rx_plus);
        assert!(squat.is_personal_record);

        assert_eq!(parsed.rows[1].component_type, ComponentType::Metcon);
    }

    #[test]
    fn test_header_column_mismatch_is_fatal() {
        let data = format!(
            "Date,Name\n{}\n",
            line("01/05/2024", "Metcon", "Fran", "Time", "5:30", false)
        );

        let parsed = parse_rows(data.as_bytes()).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 0);
        assert!(parsed.errors[0].message.contains("expected 19 columns, got 2"));
    }

    #[test]
    fn test_empty_input_reports_header_error() {
        let parsed = parse_rows("".as_bytes()).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 0);
    }

    #[test]
    fn test_short_line_is_recorded_and_scan_continues() {
        let data = export(&[
            line("01/05/2024", "Metcon", "Fran", "Time", "5:30", false),
            "Jane Doe,Main Gym,01/06/2024,CrossFit".to_string(),
            line("01/07/2024", "Gymnastics", "Pull-up", "Max reps", "25 reps", false),
        ]);

        let parsed = parse_rows(data.as_bytes()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 2);
        assert_eq!(parsed.errors[0].value.as_deref(), Some("4"));
    }

    #[test]
    fn test_malformed_line_is_recorded() {
        let mut data = export(&[line("01/05/2024", "Metcon", "Fran", "Time", "5:30", false)])
            .into_bytes();
        // Invalid UTF-8 byte inside the second data line
        let mut bad = line("01/06/2024", "Metcon", "Gr", "Time", "2:10", false).into_bytes();
        let pos = bad.iter().position(|b| *b == b'G').unwrap();
        bad.insert(pos + 1, 0xFF);
        data.extend_from_slice(&bad);
        data.push(b'\n');
        data.extend_from_slice(
            line("01/07/2024", "Metcon", "Cindy", "AMRAP - Rounds and Reps", "20 + 5", false)
                .as_bytes(),
        );

        let parsed = parse_rows(data.as_slice()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 2);
        assert!(parsed.errors[0].message.starts_with("Failed to parse row"));
    }

    #[test]
    fn test_separator_rows_are_skipped_silently() {
        let data = export(&[
            line("01/05/2024", "Metcon", "Fran", "Time", "5:30", false),
            ",,,,,,,,,,,,,,,,,,".to_string(),
        ]);

        let parsed = parse_rows(data.as_bytes()).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_missing_component_name_is_error() {
        let data = export(&[
            line("01/05/2024", "Metcon", "", "Time", "5:30", false),
            line("01/05/2024", "", "Deadlift", "Weight", "315 lbs", false),
        ]);

        let parsed = parse_rows(data.as_bytes()).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, 1);
        assert_eq!(parsed.errors[0].field.as_deref(), Some("ComponentName"));
        assert_eq!(parsed.errors[1].row, 2);
        assert_eq!(parsed.errors[1].field.as_deref(), Some("ComponentType"));
        assert_eq!(parsed.errors[1].message, "Missing component type or name");
    }

    #[test]
    fn test_boolean_columns_accept_only_true() {
        let data = export(&[
            "A,B,01/05/2024,P,C,Metcon,1,Fran,,Time,,5:30,true,yes,1,True, TRUE ,,".to_string(),
        ]);

        let parsed = parse_rows(data.as_bytes()).unwrap();
        let row = &parsed.rows[0];
        assert!(row.from_weightlifting_total);
        assert!(!row.from_variable_set);
        assert!(!row.is_rx);
        assert!(row.is_rx_plus);
        assert!(row.is_personal_record);
    }

    #[test]
    fn test_leading_spaces_are_trimmed() {
        let data = export(&[
            "A, B, 01/05/2024,P,C, Metcon,1, Fran,,Time,, 5:30,FALSE,FALSE,FALSE,FALSE,FALSE,,"
                .to_string(),
        ]);

        let parsed = parse_rows(data.as_bytes()).unwrap();
        let row = &parsed.rows[0];
        assert_eq!(row.date, "01/05/2024");
        assert_eq!(row.component_type, ComponentType::Metcon);
        assert_eq!(row.component_name, "Fran");
        assert_eq!(row.formatted_result, "5:30");
    }
}
