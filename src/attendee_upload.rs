//! Bulk attendee upload parsing.
//!
//! Organizations can fill their attendee list from a delimited text file
//! instead of typing every row. The first line must be a header; columns are
//! matched by case-insensitive substring (a header of `Participant Name`
//! counts as the name column). Rows without a name are skipped.

use thiserror::Error;

use crate::contact::AttendeeDetail;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Could not find a \"Name\" column in the file")]
    MissingNameColumn,
    #[error("The file contains no rows besides the header")]
    Empty,
    #[error("The file contains {found} attendee rows, at most {limit} are accepted")]
    TooManyRows { found: usize, limit: usize },
}

struct ColumnMap {
    name: usize,
    position: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
}

fn map_columns(header: &str) -> Result<ColumnMap, UploadError> {
    let headers: Vec<String> = header
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();
    let find = |needles: &[&str]| {
        headers
            .iter()
            .position(|h| needles.iter().any(|needle| h.contains(needle)))
    };

    Ok(ColumnMap {
        name: find(&["name"]).ok_or(UploadError::MissingNameColumn)?,
        position: find(&["position", "role"]),
        email: find(&["email"]),
        phone: find(&["phone", "tel"]),
    })
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parses delimited attendee text into detail rows.
///
/// Malformed rows are not an error: anything without a name cell is silently
/// dropped, and cells past the end of a short row read as empty.
pub fn parse_attendee_upload(
    text: &str,
    limit: usize,
) -> Result<Vec<AttendeeDetail>, UploadError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or(UploadError::Empty)?;
    let columns = map_columns(header)?;

    let cell = |values: &[&str], index: Option<usize>| {
        index
            .and_then(|i| values.get(i))
            .map_or_else(String::new, |v| strip_quotes(v).to_string())
    };

    let mut attendees = Vec::new();
    for line in lines {
        let values: Vec<&str> = line.split(',').collect();
        let name = cell(&values, Some(columns.name));
        if name.is_empty() {
            continue;
        }
        attendees.push(AttendeeDetail {
            name,
            position: cell(&values, columns.position),
            email: cell(&values, columns.email),
            phone: cell(&values, columns.phone),
        });
    }

    if attendees.is_empty() {
        return Err(UploadError::Empty);
    }
    if attendees.len() > limit {
        return Err(UploadError::TooManyRows {
            found: attendees.len(),
            limit,
        });
    }
    Ok(attendees)
}

/// The template offered for download next to the upload field.
#[must_use]
pub fn attendee_template_csv() -> &'static str {
    "Name,Position,Email,Phone\n\
     John Doe,Manager,john@example.com,+254712345678\n\
     Jane Smith,Coordinator,jane@example.com,+254712345679\n"
}
