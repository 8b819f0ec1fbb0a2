//! Row normalization and validation.
//!
//! Converts raw spreadsheet rows into canonical [`EmployeeRecord`]s through
//! a confirmed column mapping, then validates each record independently.
//! Normalization is total: malformed phone numbers and emails collapse to
//! "absent" here and are caught (or tolerated, for optionals) by the
//! validation pass that follows.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::defaults::{
    COUNTRY_CALLING_DIGITS, DEFAULT_CITY, DEFAULT_COUNTRY_CODE, PASSWORD_LENGTH, PASSWORD_SYMBOLS,
};
use crate::error::UploadError;
use crate::types::{
    CanonicalField, ColumnMapping, EmployeeRecord, ParsedSheet, RawRow, Role, ValidationErrors,
    ValidationReport,
};

/// Normalize every raw row through the confirmed mapping, producing records
/// and a validation report one-to-one with the input, in file order.
pub fn normalize_rows(
    sheet: &ParsedSheet,
    mapping: &ColumnMapping,
) -> Result<(Vec<EmployeeRecord>, ValidationReport), UploadError> {
    mapping.confirm()?;

    let mut records = Vec::with_capacity(sheet.rows.len());
    let mut report = ValidationReport::default();

    for row in &sheet.rows {
        let record = normalize_row(sheet, mapping, row);
        report.record(&record.client_row_id, validate_record(&record));
        records.push(record);
    }

    Ok((records, report))
}

fn normalize_row(sheet: &ParsedSheet, mapping: &ColumnMapping, row: &RawRow) -> EmployeeRecord {
    let name = raw_value(sheet, mapping, row, CanonicalField::Name);
    let (first_name, last_name) = split_name(name);

    EmployeeRecord {
        client_row_id: new_client_row_id(row.index),
        first_name,
        last_name,
        email: normalize_email(raw_value(sheet, mapping, row, CanonicalField::Email)),
        mobile_number: normalize_phone(raw_value(sheet, mapping, row, CanonicalField::Phone)),
        location: normalize_location(raw_value(sheet, mapping, row, CanonicalField::Location)),
        password: generate_password(),
        role: normalize_role(raw_value(sheet, mapping, row, CanonicalField::Role)),
        source_index: row.index,
    }
}

/// Raw cell for a canonical field; an absent mapping extracts `""`.
fn raw_value<'a>(
    sheet: &ParsedSheet,
    mapping: &ColumnMapping,
    row: &'a RawRow,
    field: CanonicalField,
) -> &'a str {
    mapping
        .get(field)
        .map(|column| sheet.value(row, column))
        .unwrap_or("")
}

/// Split a full name on whitespace runs: first token → first name, the rest
/// rejoined with single spaces → last name, `"NA"` sentinel when there is
/// no second token.
pub fn split_name(raw: &str) -> (String, String) {
    let mut tokens = raw.split_whitespace();
    let first = tokens.next().unwrap_or("").to_string();
    let rest: Vec<&str> = tokens.collect();
    let last = if rest.is_empty() {
        "NA".to_string()
    } else {
        rest.join(" ")
    };
    (first, last)
}

/// Normalize a phone number to international form, or `None` when it cannot
/// be coerced into a valid shape. Absence is not an error here; the
/// required-field validation catches it.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();

    if stripped.is_empty() {
        return None;
    }

    let digits_only = stripped.chars().all(|c| c.is_ascii_digit());
    let candidate = if stripped.starts_with('+') {
        stripped
    } else if digits_only && stripped.len() == 10 && !stripped.starts_with('0') {
        format!("{}{}", DEFAULT_COUNTRY_CODE, stripped)
    } else if digits_only && stripped.len() == 12 && stripped.starts_with(COUNTRY_CALLING_DIGITS) {
        format!("+{}", stripped)
    } else {
        stripped
    };

    if is_valid_phone(&candidate) {
        Some(candidate)
    } else {
        None
    }
}

/// General international-number shape: optional `+`, nonzero leading digit,
/// 1–14 further digits.
fn is_valid_phone(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    let mut chars = digits.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() && c != '0' => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    (1..=14).contains(&rest.len()) && rest.iter().all(|c| c.is_ascii_digit())
}

/// Normalize an email: trim, lowercase, require a basic `local@domain.tld`
/// shape. Never fails; malformed non-empty input collapses to `None`.
pub fn normalize_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    if is_valid_email(&lowered) {
        Some(lowered)
    } else {
        None
    }
}

fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return false;
    }
    // TLD of at least two letters.
    labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false)
}

/// Case-insensitive role coercion; anything unrecognized (including empty)
/// defaults to DRIVER.
pub fn normalize_role(raw: &str) -> Role {
    match raw.trim().to_lowercase().as_str() {
        "manager" | "mgr" | "management" => Role::Manager,
        _ => Role::Driver,
    }
}

fn normalize_location(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_CITY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generate a random password: one character from each required class, the
/// remainder uniform over the combined alphabet, then shuffled. Never
/// derived from any input field.
pub fn generate_password() -> String {
    const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    const DIGITS: &[u8] = b"0123456789";

    let symbols = PASSWORD_SYMBOLS.as_bytes();
    let mut rng = rand::thread_rng();

    let mut chars: Vec<u8> = vec![
        UPPER[rng.gen_range(0..UPPER.len())],
        LOWER[rng.gen_range(0..LOWER.len())],
        DIGITS[rng.gen_range(0..DIGITS.len())],
        symbols[rng.gen_range(0..symbols.len())],
    ];

    let combined: Vec<u8> = [UPPER, LOWER, DIGITS, symbols].concat();
    while chars.len() < PASSWORD_LENGTH {
        chars.push(combined[rng.gen_range(0..combined.len())]);
    }
    chars.shuffle(&mut rng);

    chars.into_iter().map(char::from).collect()
}

/// Session-unique row identifier: original row index + a fresh UUID.
fn new_client_row_id(index: usize) -> String {
    format!("row-{}-{}", index, Uuid::new_v4().simple())
}

/// Validate one normalized record. Runs independently of normalization;
/// the `lastName`, `password` and `role` branches are unreachable while the
/// normalization rules above hold and exist as regression guards.
pub fn validate_record(record: &EmployeeRecord) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if record.first_name.is_empty() {
        errors.insert("firstName", "First name is required".to_string());
    }
    if record.last_name.is_empty() {
        errors.insert("lastName", "Last name is required".to_string());
    }
    if record.mobile_number.is_none() {
        errors.insert(
            "mobileNumber",
            "Mobile number is required and must be valid".to_string(),
        );
    }
    if record.password.len() < 8 {
        errors.insert("password", "Password must be at least 8 characters".to_string());
    }
    if !matches!(record.role, Role::Driver | Role::Manager) {
        errors.insert("role", "Role must be DRIVER or MANAGER".to_string());
    }
    if let Some(email) = &record.email {
        if !is_valid_email(email) {
            errors.insert("email", "Email address is not valid".to_string());
        }
    }

    errors
}
