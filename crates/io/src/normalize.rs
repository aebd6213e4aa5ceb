// Header and value normalization applied at load time.

/// `" First  Name "` → `"first_name"`: trimmed, lowercased, whitespace runs
/// collapsed to a single underscore.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Emails compare case-insensitively and without surrounding whitespace.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Phones compare on ASCII digits only: `"(555) 123-4567"` → `"5551234567"`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Make normalized headers unique by suffixing repeats with `_2`, `_3`, ...
///
/// `Email` and `email ` both normalize to `email`; without this the second
/// column could never be read back by name.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        if !out.contains(&header) {
            out.push(header);
            continue;
        }
        let mut n = 2;
        let unique = loop {
            let candidate = format!("{header}_{n}");
            if !out.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        log::warn!("duplicate column '{header}' renamed to '{unique}'");
        out.push(unique);
    }
    out
}
