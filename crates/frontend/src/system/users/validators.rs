//! Account form validators
//!
//! Pure checks the settings form runs before a save request goes out. Each
//! returns the message the form shows next to its group.

use std::collections::BTreeMap;

use contracts::content::field::FieldDescriptor;
use contracts::content::validation::validate_field;
use contracts::content::value::FieldValue;

/// Minimum length of username, email and display name, in characters.
pub const MIN_ACCOUNT_FIELD_CHARS: usize = 3;

/// Minimum length of a new password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

pub fn validate_username(value: &str) -> Result<(), String> {
    check_min_chars(value, "Username")
}

pub fn validate_email(value: &str) -> Result<(), String> {
    check_min_chars(value, "Email")
}

pub fn validate_display_name(value: &str) -> Result<(), String> {
    check_min_chars(value, "Display name")
}

fn check_min_chars(value: &str, label: &str) -> Result<(), String> {
    if value.trim().chars().count() < MIN_ACCOUNT_FIELD_CHARS {
        return Err(format!(
            "{} must be at least {} characters",
            label, MIN_ACCOUNT_FIELD_CHARS
        ));
    }
    Ok(())
}

/// Check a password change before it is sent.
///
/// The repeat entry exists only on the form; the request carries the current
/// and new passwords, so a mismatch has to be caught here.
pub fn validate_password_change(
    current: &str,
    new_password: &str,
    repeat_new_password: &str,
) -> Result<(), String> {
    if current.is_empty() {
        return Err("Current password is required".to_string());
    }
    if new_password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(format!(
            "New password must be at least {} characters",
            MIN_PASSWORD_CHARS
        ));
    }
    if new_password != repeat_new_password {
        return Err("New passwords do not match".to_string());
    }
    Ok(())
}

pub fn validate_delete_account(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    Ok(())
}

/// Check every configured profile field against its descriptor. The first
/// failing field's message is the group's message.
pub fn validate_profile(
    fields: &[FieldDescriptor],
    values: &BTreeMap<String, FieldValue>,
) -> Result<(), String> {
    for field in fields {
        if let Err(err) = validate_field(field, values.get(&field.name)) {
            let message = field
                .error_message
                .clone()
                .unwrap_or_else(|| err.to_string());
            return Err(message);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::content::field::FieldType;

    #[test]
    fn account_fields_need_three_trimmed_characters() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("  ab  ").is_err());
        assert!(validate_username(" abc ").is_ok());
        assert_eq!(
            validate_email("x").unwrap_err(),
            "Email must be at least 3 characters"
        );
        assert!(validate_display_name("").is_err());
    }

    #[test]
    fn new_password_needs_eight_characters() {
        assert!(validate_password_change("current", "seven77", "seven77").is_err());
        assert!(validate_password_change("current", "eight888", "eight888").is_ok());
    }

    #[test]
    fn current_password_is_required() {
        let err = validate_password_change("", "eight888", "eight888").unwrap_err();
        assert_eq!(err, "Current password is required");
    }

    // Changing only the repeat entry must fail; the check compares the two
    // new-password entries against each other, not either against itself.
    #[test]
    fn mismatched_new_passwords_are_rejected() {
        let err = validate_password_change("current", "eight888", "eight889").unwrap_err();
        assert_eq!(err, "New passwords do not match");
        assert!(validate_password_change("current", "eight888", "eight888").is_ok());
    }

    #[test]
    fn profile_check_prefers_configured_message() {
        let mut bio = FieldDescriptor::new("bio", FieldType::TextArea, "Bio");
        bio.required = true;
        bio.error_message = Some("Tell us something about yourself".into());

        let err = validate_profile(&[bio.clone()], &BTreeMap::new()).unwrap_err();
        assert_eq!(err, "Tell us something about yourself");

        bio.error_message = None;
        let err = validate_profile(&[bio], &BTreeMap::new()).unwrap_err();
        assert_eq!(err, "Bio is required");
    }

    #[test]
    fn profile_check_passes_when_constraints_hold() {
        let mut bio = FieldDescriptor::new("bio", FieldType::TextArea, "Bio");
        bio.required = true;
        let mut values = BTreeMap::new();
        values.insert("bio".to_string(), FieldValue::Text("Engineer".into()));
        assert!(validate_profile(&[bio], &values).is_ok());
    }
}
