//! Credential CSV export.
//!
//! After a submission the generated passwords exist nowhere but this
//! session, so the created-account + password pairs are written to a CSV
//! the operator can hand out. Fixed column order, RFC4180 quoting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::UploadError;
use crate::types::CredentialRecord;

const HEADER: [&str; 7] = [
    "firstName",
    "lastName",
    "email",
    "mobileNumber",
    "role",
    "location",
    "password",
];

/// Write the credential rows to any writer. The `csv` writer handles
/// quoting for fields containing commas, quotes or newlines.
pub fn write_credentials<W: Write>(
    writer: W,
    credentials: &[CredentialRecord],
) -> Result<(), UploadError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(HEADER)
        .map_err(|e| UploadError::CredentialExport(e.to_string()))?;

    for cred in credentials {
        csv_writer
            .write_record([
                cred.created.first_name.as_str(),
                cred.created.last_name.as_str(),
                cred.created.email.as_deref().unwrap_or(""),
                cred.created.mobile_number.as_str(),
                cred.created.role.as_str(),
                cred.location.as_str(),
                cred.password.as_str(),
            ])
            .map_err(|e| UploadError::CredentialExport(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| UploadError::CredentialExport(e.to_string()))?;
    Ok(())
}

/// Write the credential CSV to a file path.
pub fn export_credentials_file(
    path: &Path,
    credentials: &[CredentialRecord],
) -> Result<(), UploadError> {
    let file = File::create(path).map_err(|e| UploadError::CredentialExport(e.to_string()))?;
    write_credentials(file, credentials)?;
    info!("wrote {} credential rows to {}", credentials.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreatedEmployee, Role};

    fn credential(first: &str, last: &str, password: &str) -> CredentialRecord {
        CredentialRecord {
            created: CreatedEmployee {
                id: "emp-1".to_string(),
                client_row_id: "r0".to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: Some("asha@example.com".to_string()),
                mobile_number: "+919876543210".to_string(),
                role: Role::Driver,
            },
            location: "Bangalore".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_header_and_column_order() {
        let mut buf = Vec::new();
        write_credentials(&mut buf, &[credential("Asha", "Rao", "Pw9!abcdefgh")]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let mut lines = out.lines();

        assert_eq!(
            lines.next().unwrap(),
            "firstName,lastName,email,mobileNumber,role,location,password"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Asha,Rao,asha@example.com,+919876543210,DRIVER,Bangalore,Pw9!abcdefgh"
        );
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut buf = Vec::new();
        write_credentials(&mut buf, &[credential("Asha", "Rao, Jr", "a,b\"c")]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let data_line = out.lines().nth(1).unwrap();

        assert!(data_line.contains("\"Rao, Jr\""));
        assert!(data_line.contains("\"a,b\"\"c\""));
    }

    #[test]
    fn test_empty_batch_writes_header_only() {
        let mut buf = Vec::new();
        write_credentials(&mut buf, &[]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().count(), 1);
    }
}
