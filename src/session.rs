//! Per-upload session state.
//!
//! One `UploadSession` owns everything a single roster upload accumulates:
//! the parsed sheet, the column mapping, the normalized records, the
//! validation report and the password lookup. Stages mutate the session
//! explicitly; there are no ambient globals. A parse failure or `reset`
//! discards the whole thing; rows are never removed individually, which
//! keeps the `clientRowId` joins trivially consistent.

use std::collections::HashMap;

use crate::error::UploadError;
use crate::services::{mapper, normalizer, parser, submitter::SubmitClient};
use crate::types::{
    ColumnMapping, EmployeeRecord, ParsedSheet, UploadOutcome, ValidationReport,
};

#[derive(Default)]
pub struct UploadSession {
    sheet: Option<ParsedSheet>,
    mapping: Option<ColumnMapping>,
    records: Vec<EmployeeRecord>,
    report: ValidationReport,
    /// Password per `clientRowId`, held for post-submission reconciliation
    /// and credential export; the server never echoes passwords back.
    passwords: HashMap<String, String>,
    outcome: Option<UploadOutcome>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an uploaded file into the session. Replaces any previous
    /// upload; on failure the session is fully reset and the error
    /// propagates.
    pub fn load_file(&mut self, filename: &str, bytes: &[u8]) -> Result<&ParsedSheet, UploadError> {
        self.reset();

        let format = parser::SheetFormat::from_filename(filename)?;
        match parser::parse_sheet(bytes, format) {
            Ok(sheet) => Ok(self.sheet.insert(sheet)),
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    /// Auto-detected mapping for the loaded sheet's columns.
    pub fn suggest_mapping(&self) -> Result<ColumnMapping, UploadError> {
        let sheet = self.sheet()?;
        Ok(mapper::suggest_mapping(&sheet.columns))
    }

    /// Confirm a (possibly user-edited) mapping and normalize every row.
    /// May be called again with a changed mapping: records, report and
    /// passwords are recreated from the raw rows each time.
    pub fn confirm_mapping(&mut self, mapping: ColumnMapping) -> Result<(), UploadError> {
        let sheet = self.sheet()?;
        let (records, report) = normalizer::normalize_rows(sheet, &mapping)?;

        self.passwords = records
            .iter()
            .map(|r| (r.client_row_id.clone(), r.password.clone()))
            .collect();
        self.records = records;
        self.report = report;
        self.mapping = Some(mapping);
        self.outcome = None;
        Ok(())
    }

    pub fn sheet(&self) -> Result<&ParsedSheet, UploadError> {
        self.sheet
            .as_ref()
            .ok_or(UploadError::InvalidState("no file loaded in session"))
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Rows with an empty error set, for the filtered inspection view.
    pub fn valid_records(&self) -> impl Iterator<Item = &EmployeeRecord> {
        self.records
            .iter()
            .filter(|r| self.report.is_row_valid(&r.client_row_id))
    }

    /// Rows carrying validation errors, for the filtered inspection view.
    pub fn invalid_records(&self) -> impl Iterator<Item = &EmployeeRecord> {
        self.records
            .iter()
            .filter(|r| !self.report.is_row_valid(&r.client_row_id))
    }

    pub fn password_for(&self, client_row_id: &str) -> Option<&str> {
        self.passwords.get(client_row_id).map(String::as_str)
    }

    /// Batch gate: the whole upload submits or nothing does.
    pub fn ensure_submittable(&self) -> Result<(), UploadError> {
        if self.mapping.is_none() || self.records.is_empty() {
            return Err(UploadError::InvalidState("no confirmed mapping in session"));
        }
        if !self.report.is_clean() {
            return Err(UploadError::RowsInvalid {
                invalid: self.report.invalid_count(),
            });
        }
        Ok(())
    }

    /// Submit the normalized batch. On payload or transport errors the
    /// normalized state is retained so the operator can trim and resubmit.
    pub async fn submit(&mut self, client: &SubmitClient) -> Result<&UploadOutcome, UploadError> {
        self.ensure_submittable()?;
        let outcome = client.submit(&self.records).await?;
        Ok(self.outcome.insert(outcome))
    }

    pub fn outcome(&self) -> Option<&UploadOutcome> {
        self.outcome.as_ref()
    }

    /// Drop the held submission result, keeping the rest of the session.
    pub fn dismiss_outcome(&mut self) {
        self.outcome = None;
    }

    /// Discard all per-upload state.
    pub fn reset(&mut self) {
        self.sheet = None;
        self.mapping = None;
        self.records.clear();
        self.report = ValidationReport::default();
        self.passwords.clear();
        self.outcome = None;
    }
}
