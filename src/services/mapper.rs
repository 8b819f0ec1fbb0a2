//! Heuristic column auto-mapping.
//!
//! Pure functions over the parsed column list; no session state, no I/O.
//! The suggestion is a starting point; the caller applies user overrides
//! and validates required fields through [`ColumnMapping::confirm`].

use crate::types::{CanonicalField, ColumnMapping};

/// Substring heuristics per canonical field, tried after an exact
/// case-insensitive match on the field key fails.
fn hints(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Name => &["name", "full"],
        CanonicalField::Phone => &["phone", "mobile", "contact"],
        CanonicalField::Email => &["email", "mail"],
        CanonicalField::Role => &["role", "designation"],
        CanonicalField::Location => &["location", "city", "branch"],
    }
}

/// Best-effort mapping of raw column names onto the canonical fields.
///
/// Per field: (a) exact case-insensitive match against the field key, then
/// (b) first column in file order containing one of the field's hint
/// substrings. Fields with no match stay unmapped.
pub fn suggest_mapping(columns: &[String]) -> ColumnMapping {
    let lowered: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
    let mut mapping = ColumnMapping::new();

    for field in CanonicalField::ALL {
        let exact = lowered.iter().position(|c| c == field.key());
        let chosen = exact.or_else(|| {
            lowered
                .iter()
                .position(|c| hints(field).iter().any(|hint| c.contains(hint)))
        });

        if let Some(idx) = chosen {
            mapping.set(field, columns[idx].clone());
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_exact_key_match_wins() {
        let mapping = suggest_mapping(&cols(&["Role", "Name", "Phone"]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("Name"));
        assert_eq!(mapping.get(CanonicalField::Phone), Some("Phone"));
        assert_eq!(mapping.get(CanonicalField::Role), Some("Role"));
    }

    #[test]
    fn test_substring_heuristics() {
        let mapping = suggest_mapping(&cols(&[
            "Full Name",
            "Mobile No.",
            "E-mail Address",
            "Designation",
            "Branch City",
        ]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("Full Name"));
        assert_eq!(mapping.get(CanonicalField::Phone), Some("Mobile No."));
        assert_eq!(mapping.get(CanonicalField::Email), Some("E-mail Address"));
        assert_eq!(mapping.get(CanonicalField::Role), Some("Designation"));
        assert_eq!(mapping.get(CanonicalField::Location), Some("Branch City"));
    }

    #[test]
    fn test_first_match_in_column_order() {
        // Both columns contain "phone"; the earlier one is chosen.
        let mapping = suggest_mapping(&cols(&["Home Phone", "Work Phone"]));
        assert_eq!(mapping.get(CanonicalField::Phone), Some("Home Phone"));
    }

    #[test]
    fn test_unmatched_fields_stay_unmapped() {
        let mapping = suggest_mapping(&cols(&["Column A", "Column B"]));
        for field in CanonicalField::ALL {
            assert!(mapping.get(field).is_none(), "{} should be unmapped", field);
        }
        assert_eq!(mapping.missing_required().len(), 2);
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        // "Nickname" contains "name" and comes first, but "name" matches
        // the key exactly and wins.
        let mapping = suggest_mapping(&cols(&["Nickname", "name"]));
        assert_eq!(mapping.get(CanonicalField::Name), Some("name"));
    }
}
