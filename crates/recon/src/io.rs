//! CSV loading and writing for the meeting export and the roster.
//!
//! Functions take and return in-memory text; the caller owns file access.

use crate::config::{RosterConfig, SessionConfig};
use crate::error::{ReconError, Result};
use crate::model::{parse_duration, Roster, RosterEntry, SessionAttendance};
use crate::normalize::{normalize, NamePart};

const BOM: char = '\u{feff}';

/// Drop the first `n` physical lines. Meeting exports put summary rows
/// (and a blank separator) above the participant header.
///
/// Lines are counted before CSV parsing, so a quoted metadata field that
/// spans a newline counts as two lines and shifts the header row.
fn skip_lines(data: &str, n: usize) -> &str {
    let mut rest = data;
    for _ in 0..n {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}

fn reader(data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes())
}

fn header_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name.trim())
}

/// Load meeting-export rows into session records, in file order.
///
/// The name column is required. A missing duration column, or a blank,
/// unparseable or negative duration cell, counts as 0 minutes.
pub fn load_session_csv(csv_data: &str, config: &SessionConfig) -> Result<Vec<SessionAttendance>> {
    let data = skip_lines(csv_data.trim_start_matches(BOM), config.skip_rows);
    let mut reader = reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let name_idx = header_index(&headers, &config.name_column).ok_or_else(|| {
        ReconError::MissingColumn {
            input: "session".into(),
            column: config.name_column.clone(),
        }
    })?;
    let duration_idx = header_index(&headers, &config.duration_column);
    if duration_idx.is_none() {
        tracing::warn!(
            column = %config.duration_column,
            "session duration column not found, treating all durations as 0"
        );
    }

    let mut records = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let display_name = record.get(name_idx).unwrap_or("").to_string();
        let raw = duration_idx.and_then(|d| record.get(d));
        let (minutes, coerced) = parse_duration(raw);
        if coerced {
            tracing::warn!(
                row = i + 1,
                attendee = %display_name,
                value = raw.unwrap_or(""),
                "unparseable duration, using 0"
            );
        }
        records.push(SessionAttendance::new(display_name, minutes));
    }

    tracing::debug!(records = records.len(), "loaded session records");
    Ok(records)
}

/// Load the roster, deriving each row's canonical name. Every original
/// column is kept for writing back. A row without a first or last name
/// fails the whole load.
pub fn load_roster_csv(csv_data: &str, config: &RosterConfig) -> Result<Roster> {
    let mut reader = reader(csv_data.trim_start_matches(BOM));

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let idx = |name: &str| -> Result<usize> {
        header_index(&headers, name).ok_or_else(|| ReconError::MissingColumn {
            input: "roster".into(),
            column: name.into(),
        })
    };
    let first_idx = idx(&config.first_name_column)?;
    let last_idx = idx(&config.last_name_column)?;

    let mut entries = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let canonical_name = normalize(record.get(first_idx), record.get(last_idx)).map_err(
            |part| ReconError::MissingField {
                row,
                field: match part {
                    NamePart::First => config.first_name_column.clone(),
                    NamePart::Last => config.last_name_column.clone(),
                },
            },
        )?;

        let mut fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        fields.resize(headers.len(), String::new());

        let mut entry = RosterEntry::new(canonical_name);
        entry.fields = fields;
        entries.push(entry);
    }

    tracing::debug!(entries = entries.len(), "loaded roster");
    Ok(Roster { headers, entries })
}

/// Write the roster back as CSV.
///
/// Original columns keep their order. The status column is renamed to
/// `status_output_column` and overwritten; if the roster has no status
/// column one is appended. The canonical name goes in `full_name_column`,
/// overwriting an existing column of that name or appended otherwise.
pub fn write_roster_csv(roster: &Roster, config: &RosterConfig) -> Result<String> {
    let mut headers = roster.headers.clone();

    let full_name_idx = match header_index(&headers, &config.full_name_column) {
        Some(i) => i,
        None => {
            headers.push(config.full_name_column.clone());
            headers.len() - 1
        }
    };
    let status_idx = match header_index(&headers, &config.status_column) {
        Some(i) => {
            headers[i] = config.status_output_column.clone();
            i
        }
        None => match header_index(&headers, &config.status_output_column) {
            Some(i) => i,
            None => {
                headers.push(config.status_output_column.clone());
                headers.len() - 1
            }
        },
    };

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(&headers)?;

    for entry in &roster.entries {
        let mut row = entry.fields.clone();
        row.resize(headers.len(), String::new());
        row[full_name_idx] = entry.canonical_name.clone();
        row[status_idx] = entry.status.to_string();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReconError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReconError::Csv(e.to_string()))
}
