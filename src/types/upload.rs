//! Upload pipeline types: raw rows, column mapping, validation report and
//! the backend submission result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UploadError;
use crate::types::Role;

/// One spreadsheet row, cells aligned with the sheet's column list.
/// Immutable once parsed.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// Position of this row in the uploaded file (0-based, data rows only).
    pub index: usize,
    pub cells: Vec<String>,
}

/// Result of parsing an uploaded file: ordered columns plus data rows.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Set when the file held more rows than the cap and the tail was dropped.
    pub truncated: bool,
}

impl ParsedSheet {
    /// Cell value for `row` under the named column, or `""` when the column
    /// does not exist. Extraction is always string-coerced at parse time, so
    /// callers never see a non-string cell.
    pub fn value<'a>(&self, row: &'a RawRow, column: &str) -> &'a str {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| row.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// The five canonical employee fields raw columns are mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    Name,
    Phone,
    Email,
    Role,
    Location,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::Name,
        CanonicalField::Phone,
        CanonicalField::Email,
        CanonicalField::Role,
        CanonicalField::Location,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Phone => "phone",
            CanonicalField::Email => "email",
            CanonicalField::Role => "role",
            CanonicalField::Location => "location",
        }
    }

    /// Human label used in mapping validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::Name => "Name",
            CanonicalField::Phone => "Phone",
            CanonicalField::Email => "Email",
            CanonicalField::Role => "Role",
            CanonicalField::Location => "Location",
        }
    }

    /// `name` and `phone` must be mapped before confirmation.
    pub fn required(&self) -> bool {
        matches!(self, CanonicalField::Name | CanonicalField::Phone)
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Mapping from canonical field to source column name. Built once per upload
/// session; confirmed via [`ColumnMapping::confirm`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    assignments: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.assignments.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: CanonicalField, column: impl Into<String>) {
        self.assignments.insert(field, column.into());
    }

    /// Unmap a field. Permitted for optional fields; a cleared required
    /// field is caught again at confirmation time.
    pub fn clear(&mut self, field: CanonicalField) {
        self.assignments.remove(&field);
    }

    /// Required fields that are not mapped to any column, in declaration order.
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .iter()
            .copied()
            .filter(|f| f.required() && !self.assignments.contains_key(f))
            .collect()
    }

    /// Validate that every required field is mapped.
    pub fn confirm(&self) -> Result<(), UploadError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            return Ok(());
        }
        let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
        Err(UploadError::MappingIncomplete(labels.join(", ")))
    }
}

/// Field name → human-readable message for a single row. Empty = valid.
pub type ValidationErrors = BTreeMap<&'static str, String>;

/// Per-row validation errors, keyed by `clientRowId` rather than array
/// position so the join survives filtering and reordering.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    by_row: BTreeMap<String, ValidationErrors>,
}

impl ValidationReport {
    /// Record the outcome for one row. Clean rows are not stored.
    pub fn record(&mut self, client_row_id: &str, errors: ValidationErrors) {
        if !errors.is_empty() {
            self.by_row.insert(client_row_id.to_string(), errors);
        }
    }

    pub fn errors_for(&self, client_row_id: &str) -> Option<&ValidationErrors> {
        self.by_row.get(client_row_id)
    }

    pub fn is_row_valid(&self, client_row_id: &str) -> bool {
        !self.by_row.contains_key(client_row_id)
    }

    /// True when no row carries an error: the batch submission gate.
    pub fn is_clean(&self) -> bool {
        self.by_row.is_empty()
    }

    pub fn invalid_count(&self) -> usize {
        self.by_row.len()
    }
}

/// One created record echoed back by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEmployee {
    pub id: String,
    pub client_row_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub mobile_number: String,
    pub role: Role,
}

/// Per-row error reported by the server (e.g. duplicate phone number).
/// Displayed verbatim, never merged into the pre-submission report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub index: usize,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Backend response for a submitted batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub status: String,
    pub created_count: u32,
    pub error_count: u32,
    pub created: Vec<CreatedEmployee>,
    pub errors: Vec<RowError>,
}

/// A created record joined with its locally-held password and location.
/// The password is a one-time, client-local convenience; the server never
/// returns it and it cannot be re-fetched later.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub created: CreatedEmployee,
    pub location: String,
    pub password: String,
}

/// Submission result plus the reconciled credential pairs.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub result: UploadResult,
    pub credentials: Vec<CredentialRecord>,
    pub submitted_at: DateTime<Utc>,
}
