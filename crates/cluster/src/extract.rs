use crate::config::MatchMode;
use crate::model::Record;

/// Column classification supplied by the loader: which field names carry
/// emails and which carry phone numbers. A name may appear in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRoles {
    pub email_fields: Vec<String>,
    pub phone_fields: Vec<String>,
}

impl FieldRoles {
    pub fn new(email_fields: Vec<String>, phone_fields: Vec<String>) -> Self {
        Self {
            email_fields,
            phone_fields,
        }
    }

    /// True when `mode` has at least one field to read from.
    pub fn covers(&self, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Email => !self.email_fields.is_empty(),
            MatchMode::Phone => !self.phone_fields.is_empty(),
            MatchMode::EmailOrPhone => {
                !self.email_fields.is_empty() || !self.phone_fields.is_empty()
            }
        }
    }
}

/// Candidate match values for one record.
///
/// Values come out in field order (email fields first for `EmailOrPhone`).
/// Empty and whitespace-only values are dropped; a value repeated across the
/// record's own fields is kept once.
pub fn extract_match_values(record: &Record, mode: MatchMode, roles: &FieldRoles) -> Vec<String> {
    let raw = match mode {
        MatchMode::Email => email_values(record, roles),
        MatchMode::Phone => phone_values(record, roles),
        MatchMode::EmailOrPhone => {
            let mut values = email_values(record, roles);
            values.extend(phone_values(record, roles));
            values
        }
    };

    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for value in raw {
        if value.trim().is_empty() || out.iter().any(|v| v == value) {
            continue;
        }
        out.push(value.to_string());
    }
    out
}

fn email_values<'r>(record: &'r Record, roles: &FieldRoles) -> Vec<&'r str> {
    field_values(record, &roles.email_fields)
}

fn phone_values<'r>(record: &'r Record, roles: &FieldRoles) -> Vec<&'r str> {
    field_values(record, &roles.phone_fields)
}

fn field_values<'r>(record: &'r Record, fields: &[String]) -> Vec<&'r str> {
    fields.iter().filter_map(|f| record.get(f)).collect()
}
