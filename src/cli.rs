//! CLI argument parsing for the roster-worker binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::CanonicalField;

#[derive(Parser)]
#[command(name = "roster-worker", about = "Fleetline bulk employee roster importer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a roster file and print the suggested column mapping and
    /// per-row validation summary without submitting anything
    Inspect {
        /// Roster file (.csv, .xls or .xlsx)
        file: PathBuf,
    },
    /// Run the full import pipeline and submit the batch
    Import {
        /// Roster file (.csv, .xls or .xlsx)
        file: PathBuf,
        /// Override a mapping as field=Column (repeatable); fields are
        /// name, phone, email, role, location
        #[arg(long = "map", value_parser = parse_mapping_override)]
        map: Vec<(CanonicalField, String)>,
        /// Run every stage including the payload-size gate, but skip the
        /// HTTP submission
        #[arg(long)]
        dry_run: bool,
        /// Where to write the created-account credential CSV
        #[arg(long, default_value = "credentials.csv")]
        credentials_out: PathBuf,
    },
}

fn parse_mapping_override(raw: &str) -> Result<(CanonicalField, String), String> {
    let (field, column) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=Column, got '{}'", raw))?;

    let field = CanonicalField::ALL
        .iter()
        .copied()
        .find(|f| f.key() == field.to_lowercase())
        .ok_or_else(|| format!("unknown field '{}' (name, phone, email, role, location)", field))?;

    if column.is_empty() {
        return Err(format!("no column given for field '{}'", field));
    }
    Ok((field, column.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_inspect_parses() {
        let cli = Cli::parse_from(["roster-worker", "inspect", "roster.csv"]);
        assert!(matches!(cli.command, Command::Inspect { .. }));
    }

    #[test]
    fn test_cli_import_with_overrides() {
        let cli = Cli::parse_from([
            "roster-worker",
            "import",
            "roster.xlsx",
            "--map",
            "phone=Contact No",
            "--map",
            "name=Employee",
            "--dry-run",
        ]);
        match cli.command {
            Command::Import { map, dry_run, .. } => {
                assert!(dry_run);
                assert_eq!(map.len(), 2);
                assert_eq!(map[0], (CanonicalField::Phone, "Contact No".to_string()));
            }
            _ => panic!("expected import command"),
        }
    }

    #[test]
    fn test_mapping_override_rejects_unknown_field() {
        assert!(parse_mapping_override("salary=Pay").is_err());
        assert!(parse_mapping_override("no-equals").is_err());
        assert!(parse_mapping_override("phone=").is_err());
    }
}
