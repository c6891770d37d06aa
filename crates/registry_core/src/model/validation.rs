//! Field validation for user registration.
//!
//! # Responsibility
//! - Turn untrusted form strings into a normalized `UserRecord`.
//! - Report the first failing field with a stable code and message.
//!
//! # Invariants
//! - Fields are checked in the order name, email, phone, age, dob.
//! - Validation is pure; it never touches storage or logging.

use crate::model::user::{DobInput, RawUserFields, UserRecord, DOB_FORMAT};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_DIGITS: usize = 10;
const MIN_AGE: i64 = 1;
const MAX_AGE: i64 = 119;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Single validation failure, one variant per form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    InvalidName,
    InvalidEmail,
    InvalidPhone,
    InvalidAge,
    InvalidDate,
}

impl ValidationError {
    /// Stable machine-readable code for UI/FFI callers.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPhone => "invalid_phone",
            Self::InvalidAge => "invalid_age",
            Self::InvalidDate => "invalid_date",
        }
    }

    /// Human-readable message suitable for an error dialog.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidName => "Name must be at least 2 characters long.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::InvalidPhone => "Please enter a valid phone number (at least 10 digits).",
            Self::InvalidAge => "Please enter a valid age between 1 and 119.",
            Self::InvalidDate => "Please enter a valid date in YYYY-MM-DD format.",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ValidationError {}

/// Validates raw form fields into a normalized record.
///
/// Short-circuits on the first failing field; never aggregates errors.
pub fn validate(raw: &RawUserFields) -> Result<UserRecord, ValidationError> {
    let name = validate_name(&raw.name)?;
    let email = validate_email(&raw.email)?;
    let phone = validate_phone(&raw.phone)?;
    let age = validate_age(&raw.age)?;
    let dob = validate_dob(&raw.dob)?;

    Ok(UserRecord {
        name,
        email,
        phone,
        age,
        dob,
    })
}

/// Re-checks an already-built record, e.g. one read back from storage.
pub fn check_record(record: &UserRecord) -> Result<(), ValidationError> {
    if validate_name(&record.name)? != record.name {
        return Err(ValidationError::InvalidName);
    }
    if validate_email(&record.email)? != record.email {
        return Err(ValidationError::InvalidEmail);
    }
    if validate_phone(&record.phone)? != record.phone {
        return Err(ValidationError::InvalidPhone);
    }
    check_age(i64::from(record.age))?;
    check_year(record.dob)?;
    Ok(())
}

pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::InvalidName);
    }
    Ok(name.to_string())
}

pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_string())
}

/// Accepts ASCII digits only. There is no upper bound on length.
pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let phone = raw.trim();
    if phone.len() < MIN_PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(phone.to_string())
}

pub fn validate_age(raw: &str) -> Result<u8, ValidationError> {
    let age = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidAge)?;
    check_age(age)
}

pub fn validate_dob(input: &DobInput) -> Result<NaiveDate, ValidationError> {
    let date = match input {
        DobInput::Structured(date) => *date,
        DobInput::RawText(text) => NaiveDate::parse_from_str(text.trim(), DOB_FORMAT)
            .map_err(|_| ValidationError::InvalidDate)?,
    };
    check_year(date)
}

fn check_age(age: i64) -> Result<u8, ValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::InvalidAge);
    }
    u8::try_from(age).map_err(|_| ValidationError::InvalidAge)
}

// Four-digit years keep the rendered date at exactly 10 characters.
fn check_year(date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if !(1..=9999).contains(&date.year()) {
        return Err(ValidationError::InvalidDate);
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::{check_record, validate, ValidationError};
    use crate::model::user::{DobInput, RawUserFields};
    use chrono::NaiveDate;

    fn valid_fields() -> RawUserFields {
        RawUserFields {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            phone: "5551234567".to_string(),
            age: "30".to_string(),
            dob: DobInput::RawText("1994-05-01".to_string()),
        }
    }

    fn with(mutate: impl FnOnce(&mut RawUserFields)) -> Result<(), ValidationError> {
        let mut fields = valid_fields();
        mutate(&mut fields);
        validate(&fields).map(|_| ())
    }

    #[test]
    fn valid_fields_produce_normalized_record() {
        let record = validate(&valid_fields()).unwrap();
        assert_eq!(record.name, "Jane");
        assert_eq!(record.age, 30);
        assert_eq!(record.dob_text(), "1994-05-01");
        assert_eq!(record.dob_text().len(), 10);
    }

    #[test]
    fn fields_are_trimmed() {
        let mut fields = valid_fields();
        fields.name = "  Jane  ".to_string();
        fields.email = " jane@x.com ".to_string();
        fields.phone = " 5551234567\t".to_string();
        fields.age = " 30 ".to_string();
        fields.dob = DobInput::RawText(" 1994-05-01 ".to_string());

        let record = validate(&fields).unwrap();
        assert_eq!(record.name, "Jane");
        assert_eq!(record.email, "jane@x.com");
        assert_eq!(record.phone, "5551234567");
    }

    #[test]
    fn name_requires_two_characters() {
        assert_eq!(with(|f| f.name = "A".into()), Err(ValidationError::InvalidName));
        assert_eq!(with(|f| f.name = "   ".into()), Err(ValidationError::InvalidName));
        assert_eq!(with(|f| f.name = " A ".into()), Err(ValidationError::InvalidName));
        assert_eq!(with(|f| f.name = "Al".into()), Ok(()));
    }

    #[test]
    fn email_pattern() {
        assert_eq!(with(|f| f.email = "bad@@x".into()), Err(ValidationError::InvalidEmail));
        assert_eq!(with(|f| f.email = "a@b.c".into()), Err(ValidationError::InvalidEmail));
        assert_eq!(with(|f| f.email = "a@b.c0m".into()), Err(ValidationError::InvalidEmail));
        assert_eq!(with(|f| f.email = "a.b+c@sub.example.co".into()), Ok(()));
    }

    #[test]
    fn phone_digits_only_with_minimum_length() {
        assert_eq!(with(|f| f.phone = "12345".into()), Err(ValidationError::InvalidPhone));
        assert_eq!(with(|f| f.phone = "12345abcde".into()), Err(ValidationError::InvalidPhone));
        assert_eq!(with(|f| f.phone = "123-456-7890".into()), Err(ValidationError::InvalidPhone));
        assert_eq!(with(|f| f.phone = "1234567890".into()), Ok(()));
        assert_eq!(with(|f| f.phone = "1".repeat(32)), Ok(()));
    }

    #[test]
    fn age_range_is_one_to_one_hundred_nineteen() {
        for bad in ["0", "120", "abc", "", "-5", "1.5", "99999999999999999999"] {
            assert_eq!(
                with(|f| f.age = bad.into()),
                Err(ValidationError::InvalidAge),
                "age `{bad}` should be rejected"
            );
        }
        assert_eq!(with(|f| f.age = "1".into()), Ok(()));
        assert_eq!(with(|f| f.age = "119".into()), Ok(()));
    }

    #[test]
    fn raw_text_dob_must_be_a_calendar_date() {
        let dob = |text: &str| DobInput::RawText(text.to_string());
        assert_eq!(with(|f| f.dob = dob("2024-13-01")), Err(ValidationError::InvalidDate));
        assert_eq!(with(|f| f.dob = dob("2023-02-29")), Err(ValidationError::InvalidDate));
        assert_eq!(with(|f| f.dob = dob("01/05/1994")), Err(ValidationError::InvalidDate));
        assert_eq!(with(|f| f.dob = dob("")), Err(ValidationError::InvalidDate));
        assert_eq!(with(|f| f.dob = dob("2024-02-29")), Ok(()));
    }

    #[test]
    fn structured_dob_is_reformatted() {
        let mut fields = valid_fields();
        fields.dob = DobInput::Structured(NaiveDate::from_ymd_opt(2001, 2, 3).unwrap());
        let record = validate(&fields).unwrap();
        assert_eq!(record.dob_text(), "2001-02-03");
    }

    #[test]
    fn first_failing_field_wins() {
        let fields = RawUserFields {
            name: "A".to_string(),
            email: "bad@@x".to_string(),
            phone: "1".to_string(),
            age: "0".to_string(),
            dob: DobInput::RawText("nope".to_string()),
        };
        assert_eq!(validate(&fields), Err(ValidationError::InvalidName));

        let mut fields = valid_fields();
        fields.phone = "1".to_string();
        fields.dob = DobInput::RawText("nope".to_string());
        assert_eq!(validate(&fields), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn error_codes_and_messages_are_stable() {
        assert_eq!(ValidationError::InvalidAge.code(), "invalid_age");
        assert_eq!(
            ValidationError::InvalidDate.to_string(),
            "Please enter a valid date in YYYY-MM-DD format."
        );
    }

    #[test]
    fn check_record_rejects_untrimmed_name() {
        let mut record = validate(&valid_fields()).unwrap();
        assert_eq!(check_record(&record), Ok(()));
        record.name = " Jane".to_string();
        assert_eq!(check_record(&record), Err(ValidationError::InvalidName));
    }
}
