//! User record model.
//!
//! # Responsibility
//! - Define the normalized record persisted in the `users` table.
//! - Define the raw field set received from the presentation layer.
//!
//! # Invariants
//! - `UserRecord::dob` is always rendered as `YYYY-MM-DD`.
//! - `name` is the lookup key and is compared exactly (no case folding).

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Field-map key for the user's name.
pub const FIELD_NAME: &str = "name";
/// Field-map key for the email address.
pub const FIELD_EMAIL: &str = "email";
/// Field-map key for the phone number.
pub const FIELD_PHONE: &str = "phone";
/// Field-map key for the age.
pub const FIELD_AGE: &str = "age";
/// Field-map key for the date of birth.
pub const FIELD_DOB: &str = "dob";

/// Storage and display format for dates of birth.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Validated user record, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    /// Trimmed display name, at least 2 characters. Primary key.
    pub name: String,
    /// Trimmed email address.
    pub email: String,
    /// ASCII digits only, at least 10 of them.
    pub phone: String,
    /// Age in years, 1..=119.
    pub age: u8,
    /// Date of birth.
    pub dob: NaiveDate,
}

impl UserRecord {
    /// Returns the date of birth in its canonical `YYYY-MM-DD` form.
    pub fn dob_text(&self) -> String {
        self.dob.format(DOB_FORMAT).to_string()
    }
}

/// A record as read back from storage, with its insert timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUser {
    pub record: UserRecord,
    /// SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
}

impl StoredUser {
    /// Renders the record as label/value pairs for display.
    pub fn display_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.record.name.clone()),
            ("Email", self.record.email.clone()),
            ("Phone", self.record.phone.clone()),
            ("Age", self.record.age.to_string()),
            ("DOB", self.record.dob_text()),
            ("Registered", self.created_at.clone()),
        ]
    }
}

/// Date of birth as delivered by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DobInput {
    /// Value picked from a calendar widget; already a valid date.
    Structured(NaiveDate),
    /// Free text that must parse as `YYYY-MM-DD`.
    RawText(String),
}

impl Default for DobInput {
    fn default() -> Self {
        Self::RawText(String::new())
    }
}

/// Untrusted form input, one string per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawUserFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub dob: DobInput,
}

impl RawUserFields {
    /// Builds raw fields from a field-name to value map.
    ///
    /// Missing keys become empty strings and fail validation for that
    /// field. The date is always treated as free text.
    pub fn from_field_map(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self {
            name: get(FIELD_NAME),
            email: get(FIELD_EMAIL),
            phone: get(FIELD_PHONE),
            age: get(FIELD_AGE),
            dob: DobInput::RawText(get(FIELD_DOB)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DobInput, RawUserFields, StoredUser, UserRecord};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn jane() -> UserRecord {
        UserRecord {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            phone: "5551234567".to_string(),
            age: 30,
            dob: NaiveDate::from_ymd_opt(1994, 5, 1).unwrap(),
        }
    }

    #[test]
    fn dob_text_is_zero_padded() {
        assert_eq!(jane().dob_text(), "1994-05-01");
    }

    #[test]
    fn display_fields_use_fixed_labels_in_order() {
        let stored = StoredUser {
            record: jane(),
            created_at: "2026-01-02 03:04:05".to_string(),
        };
        let labels: Vec<_> = stored.display_fields().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, ["Name", "Email", "Phone", "Age", "DOB", "Registered"]);
        assert_eq!(stored.display_fields()[4].1, "1994-05-01");
    }

    #[test]
    fn from_field_map_defaults_missing_keys_to_empty() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), "Al".to_string());
        fields.insert("dob".to_string(), "2000-01-01".to_string());

        let raw = RawUserFields::from_field_map(&fields);
        assert_eq!(raw.name, "Al");
        assert!(raw.email.is_empty());
        assert!(raw.age.is_empty());
        assert_eq!(raw.dob, DobInput::RawText("2000-01-01".to_string()));
    }

    #[test]
    fn record_serializes_dob_as_iso_date() {
        let json = serde_json::to_value(jane()).unwrap();
        assert_eq!(json["dob"], "1994-05-01");
        assert_eq!(json["age"], 30);
    }
}
