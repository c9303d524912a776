//! Required-field checks run before assembly.

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;

/// Returns the dotted paths of required fields that are empty or whitespace.
pub fn missing_required_fields(record: &ResumeRecord) -> Vec<&'static str> {
    let required: [(&'static str, &str); 4] = [
        ("name", record.name.as_str()),
        ("contact.address", record.contact.address.as_str()),
        ("contact.phone", record.contact.phone.as_str()),
        ("contact.email", record.contact.email.as_str()),
    ];

    required
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
}

/// Rejects a record whose name or contact fields are blank.
pub fn validate_record(record: &ResumeRecord) -> Result<(), AppError> {
    let missing = missing_required_fields(record);
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::Validation(format!(
        "Missing required fields: {}",
        missing.join(", ")
    )))
}
