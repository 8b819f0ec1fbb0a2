//! Employee record types

use serde::{Deserialize, Serialize};

/// Employee role on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Driver,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "DRIVER",
            Role::Manager => "MANAGER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A canonical employee record derived from one raw spreadsheet row.
///
/// `client_row_id` is the only key used to correlate this record with its
/// validation errors, its locally-held password and the backend result.
/// `source_index` is display/debugging context only, never a join key.
#[derive(Debug, Clone)]
pub struct EmployeeRecord {
    pub client_row_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub location: String,
    pub password: String,
    pub role: Role,
    /// Original position of the source row in the uploaded file.
    pub source_index: usize,
}

/// Wire record sent to the backend. Internal-only fields (source index,
/// raw-row back-reference) are stripped; `clientRowId` stays so the server
/// can echo it back on created records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    pub client_row_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub mobile_number: String,
    pub location: Option<String>,
    pub password: String,
    pub role: Role,
}

impl From<&EmployeeRecord> for EmployeePayload {
    fn from(record: &EmployeeRecord) -> Self {
        Self {
            client_row_id: record.client_row_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            // The batch gate guarantees a validated, present number.
            mobile_number: record.mobile_number.clone().unwrap_or_default(),
            location: Some(record.location.clone()),
            password: record.password.clone(),
            role: record.role,
        }
    }
}
