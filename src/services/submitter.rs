//! Batch submission and response reconciliation.
//!
//! One POST per batch, no retry, no chunking. The caller has already gated
//! the batch (every row valid); this stage owns the payload-size gate, the
//! HTTP exchange and the `clientRowId` join between created records and the
//! locally-held passwords.

use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::UploadError;
use crate::types::{CredentialRecord, EmployeePayload, EmployeeRecord, UploadOutcome, UploadResult};

/// Client for the roster submission endpoint.
pub struct SubmitClient {
    http: reqwest::Client,
    endpoint: String,
    max_payload_bytes: usize,
}

/// Body shape some backend errors carry; used to surface the most specific
/// message available before falling back to a generic one.
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl SubmitClient {
    pub fn new(endpoint: String, max_payload_bytes: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            max_payload_bytes,
        }
    }

    /// Submit a fully-valid batch and reconcile the response.
    pub async fn submit(&self, records: &[EmployeeRecord]) -> Result<UploadOutcome, UploadError> {
        let payloads = build_payloads(records);
        let size = check_payload_size(&payloads, self.max_payload_bytes)?;
        info!("submitting {} employee records ({} bytes)", payloads.len(), size);

        let response = self.http.post(&self.endpoint).json(&payloads).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::PAYLOAD_TOO_LARGE {
            return Err(UploadError::PayloadRejectedByServer);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServerErrorBody>(&body)
                .ok()
                .and_then(|b| b.message.or(b.error))
                .unwrap_or_else(|| "request failed".to_string());
            return Err(UploadError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let result: UploadResult = response.json().await?;
        info!(
            "upload complete: {} created, {} errors",
            result.created_count, result.error_count
        );

        let credentials = reconcile(&result, records);
        Ok(UploadOutcome {
            result,
            credentials,
            submitted_at: Utc::now(),
        })
    }
}

/// Build the wire records, stripping internal-only fields.
pub fn build_payloads(records: &[EmployeeRecord]) -> Vec<EmployeePayload> {
    records.iter().map(EmployeePayload::from).collect()
}

/// Measure the serialized batch against the configured cap. Returns the
/// actual byte length when it fits.
pub fn check_payload_size(
    payloads: &[EmployeePayload],
    max_bytes: usize,
) -> Result<usize, UploadError> {
    let actual = serde_json::to_vec(payloads)?.len();
    if actual > max_bytes {
        return Err(UploadError::PayloadTooLarge {
            actual,
            max: max_bytes,
        });
    }
    Ok(actual)
}

/// Join created records back to their locally-held passwords and locations
/// by `clientRowId`. The server is the source of truth for what was
/// created; a created record with no local counterpart is logged and
/// skipped rather than invented.
pub fn reconcile(result: &UploadResult, records: &[EmployeeRecord]) -> Vec<CredentialRecord> {
    let by_id: HashMap<&str, &EmployeeRecord> = records
        .iter()
        .map(|r| (r.client_row_id.as_str(), r))
        .collect();

    let mut credentials = Vec::with_capacity(result.created.len());
    for created in &result.created {
        match by_id.get(created.client_row_id.as_str()) {
            Some(record) => credentials.push(CredentialRecord {
                created: created.clone(),
                location: record.location.clone(),
                password: record.password.clone(),
            }),
            None => {
                warn!(
                    "created record '{}' has no local row, password unavailable",
                    created.client_row_id
                );
            }
        }
    }
    credentials
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreatedEmployee, Role, RowError};

    fn record(id: &str, index: usize) -> EmployeeRecord {
        EmployeeRecord {
            client_row_id: id.to_string(),
            first_name: format!("First{}", index),
            last_name: "NA".to_string(),
            email: None,
            mobile_number: Some("+919876543210".to_string()),
            location: "Bangalore".to_string(),
            password: format!("Pw9!aaaaaaa{}", index),
            role: Role::Driver,
            source_index: index,
        }
    }

    fn created_for(record: &EmployeeRecord, server_id: &str) -> CreatedEmployee {
        CreatedEmployee {
            id: server_id.to_string(),
            client_row_id: record.client_row_id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            mobile_number: record.mobile_number.clone().unwrap_or_default(),
            role: record.role,
        }
    }

    #[test]
    fn test_payload_size_gate_boundary() {
        let records: Vec<EmployeeRecord> = (0..3).map(|i| record(&format!("r{}", i), i)).collect();
        let payloads = build_payloads(&records);
        let exact = serde_json::to_vec(&payloads).unwrap().len();

        // Fits at exactly the limit, exceeds one byte under it.
        assert_eq!(check_payload_size(&payloads, exact).unwrap(), exact);
        match check_payload_size(&payloads, exact - 1) {
            Err(UploadError::PayloadTooLarge { actual, max }) => {
                assert_eq!(actual, exact);
                assert_eq!(max, exact - 1);
            }
            other => panic!("expected PayloadTooLarge, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_reconcile_partial_failure() {
        // 5 valid rows; the server creates 4 and reports row index 2 as a
        // duplicate. Every credential pair must carry the right password.
        let records: Vec<EmployeeRecord> = (0..5).map(|i| record(&format!("r{}", i), i)).collect();
        let created: Vec<CreatedEmployee> = records
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 2)
            .map(|(i, r)| created_for(r, &format!("emp-{}", i)))
            .collect();

        let result = UploadResult {
            status: "ok".to_string(),
            created_count: 4,
            error_count: 1,
            created,
            errors: vec![RowError {
                index: 2,
                error: "duplicate".to_string(),
                code: Some("DUPLICATE_PHONE".to_string()),
                field: Some("mobileNumber".to_string()),
            }],
        };

        let credentials = reconcile(&result, &records);
        assert_eq!(credentials.len(), 4);
        for cred in &credentials {
            let local = records
                .iter()
                .find(|r| r.client_row_id == cred.created.client_row_id)
                .unwrap();
            assert_eq!(cred.password, local.password);
            assert_eq!(cred.location, local.location);
        }
        assert!(credentials.iter().all(|c| c.created.client_row_id != "r2"));
        assert_eq!(result.errors[0].index, 2);
    }

    #[test]
    fn test_reconcile_skips_unknown_client_row_id() {
        let records = vec![record("r0", 0)];
        let stray = CreatedEmployee {
            id: "emp-x".to_string(),
            client_row_id: "never-seen".to_string(),
            first_name: "Ghost".to_string(),
            last_name: "NA".to_string(),
            email: None,
            mobile_number: "+919000000000".to_string(),
            role: Role::Driver,
        };
        let result = UploadResult {
            status: "ok".to_string(),
            created_count: 2,
            error_count: 0,
            created: vec![created_for(&records[0], "emp-0"), stray],
            errors: vec![],
        };

        let credentials = reconcile(&result, &records);
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].created.client_row_id, "r0");
    }

    #[test]
    fn test_payloads_drop_missing_email_to_null() {
        let payloads = build_payloads(&[record("r0", 0)]);
        let json = serde_json::to_value(&payloads).unwrap();
        assert_eq!(json[0]["email"], serde_json::Value::Null);
        assert_eq!(json[0]["clientRowId"], "r0");
    }
}
