// Column classification: which headers carry emails and which carry phones.

use userlink_cluster::{ColumnOverrides, FieldRoles};

use crate::error::IoError;
use crate::normalize::normalize_header;

/// Classify normalized headers into email and phone fields.
///
/// A header containing `email` is an email field, one containing `phone` is
/// a phone field (case-insensitive; a header may be both). A non-empty
/// override list replaces the heuristic for its kind; override names are
/// normalized like headers and must exist.
pub fn classify_columns(
    headers: &[String],
    overrides: &ColumnOverrides,
) -> Result<FieldRoles, IoError> {
    let email_fields = if overrides.email.is_empty() {
        by_name(headers, "email")
    } else {
        resolve(headers, &overrides.email)?
    };
    let phone_fields = if overrides.phone.is_empty() {
        by_name(headers, "phone")
    } else {
        resolve(headers, &overrides.phone)?
    };

    log::debug!("email columns: {email_fields:?}, phone columns: {phone_fields:?}");
    Ok(FieldRoles::new(email_fields, phone_fields))
}

fn by_name(headers: &[String], needle: &str) -> Vec<String> {
    headers
        .iter()
        .filter(|h| h.to_lowercase().contains(needle))
        .cloned()
        .collect()
}

fn resolve(headers: &[String], names: &[String]) -> Result<Vec<String>, IoError> {
    names
        .iter()
        .map(|name| {
            let normalized = normalize_header(name);
            if headers.contains(&normalized) {
                Ok(normalized)
            } else {
                Err(IoError::MissingColumn(name.clone()))
            }
        })
        .collect()
}
