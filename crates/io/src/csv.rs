// CSV import/export for record matching

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use userlink_cluster::{Assignment, FieldRoles, GroupId, Record, RecordKey};

use crate::error::IoError;
use crate::normalize::{dedupe_headers, normalize_email, normalize_header, normalize_phone};
use crate::OUTPUT_SUFFIX;

/// A loaded CSV: headers as written and as normalized, plus one record per
/// data row keyed by its zero-based row index.
#[derive(Debug, Clone)]
pub struct Table {
    pub raw_headers: Vec<String>,
    /// Normalized, unique header names. Record field names use these.
    pub headers: Vec<String>,
    pub delimiter: u8,
    pub records: Vec<Record>,
    /// Cells past the header width, per record. Not matched on, but written
    /// back after the named columns.
    pub overflow: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Normalize values of classified fields in place: emails trimmed and
    /// lowercased, phones reduced to digits.
    pub fn normalize_values(&mut self, roles: &FieldRoles) {
        for record in &mut self.records {
            for (name, value) in &mut record.fields {
                let Some(v) = value.as_mut() else { continue };
                if roles.email_fields.contains(name) {
                    *v = normalize_email(v);
                }
                if roles.phone_fields.contains(name) {
                    *v = normalize_phone(v);
                }
            }
        }
    }

    /// Fail if writing `id_column` would duplicate an existing column.
    pub fn ensure_id_column_free(&self, id_column: &str) -> Result<(), IoError> {
        let normalized = normalize_header(id_column);
        if self.headers.iter().any(|h| *h == normalized) {
            return Err(IoError::DuplicateIdColumn(id_column.to_string()));
        }
        Ok(())
    }
}

pub fn load_table(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    let table = load_table_from_str(&content)?;
    log::info!(
        "loaded {} records, {} columns from {}",
        table.records.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV text. The first row is the header row; empty text (or a header
/// with no data rows) yields a table with no records.
pub fn load_table_from_str(content: &str) -> Result<Table, IoError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = sniff_delimiter(content);

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = reader.records();

    let raw_headers: Vec<String> = match rows.next() {
        Some(header) => header
            .map_err(|e| IoError::Csv(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect(),
        None => Vec::new(),
    };
    let headers = dedupe_headers(raw_headers.iter().map(|h| normalize_header(h)).collect());

    let mut records = Vec::new();
    let mut overflow = Vec::new();
    for (idx, row) in rows.enumerate() {
        let row = row.map_err(|e| IoError::Csv(e.to_string()))?;
        let extra: Vec<String> = row.iter().skip(headers.len()).map(str::to_string).collect();
        if !extra.is_empty() {
            // Line numbers count the header row
            log::warn!(
                "line {}: {} cells beyond the header have no column name; kept as-is",
                idx + 2,
                extra.len()
            );
        }
        overflow.push(extra);

        let fields = headers
            .iter()
            .enumerate()
            .map(|(col, name)| (name.clone(), row.get(col).map(str::to_string)))
            .collect();

        records.push(Record {
            key: RecordKey(idx),
            fields,
        });
    }

    Ok(Table {
        raw_headers,
        headers,
        delimiter,
        records,
        overflow,
    })
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                ::csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // A candidate must split the header row
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Lines agreeing with the header's width, weighted by that width
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// `people.csv` → `people_with_user_ids.csv`, next to the input.
/// Inputs without a `.csv` extension get the suffix and `.csv` appended.
pub fn default_output_path(input: &Path) -> PathBuf {
    let is_csv = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let base = if is_csv {
        input.file_stem()
    } else {
        input.file_name()
    };
    let base = base.map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();

    input.with_file_name(format!("{base}{OUTPUT_SUFFIX}.csv"))
}

/// Write the table with the group id as the first column.
pub fn write_annotated(
    table: &Table,
    assignments: &[Assignment],
    id_column: &str,
    path: &Path,
) -> Result<(), IoError> {
    let write_err = |message: String| IoError::Write {
        path: path.display().to_string(),
        message,
    };

    let file = std::fs::File::create(path).map_err(|e| write_err(e.to_string()))?;
    write_annotated_to(table, assignments, id_column, file).map_err(|e| match e {
        IoError::Csv(message) => write_err(message),
        other => other,
    })?;

    log::info!("wrote {} records to {}", table.records.len(), path.display());
    Ok(())
}

/// Same as [`write_annotated`], to any writer. Uses the input's delimiter.
pub fn write_annotated_to<W: Write>(
    table: &Table,
    assignments: &[Assignment],
    id_column: &str,
    out: W,
) -> Result<(), IoError> {
    let group_of: HashMap<RecordKey, GroupId> = assignments
        .iter()
        .filter_map(|a| a.group_id.map(|g| (a.key, g)))
        .collect();

    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(table.delimiter)
        .flexible(true)
        .from_writer(out);

    if !table.raw_headers.is_empty() {
        let mut header: Vec<&str> = Vec::with_capacity(table.raw_headers.len() + 1);
        header.push(id_column);
        header.extend(table.raw_headers.iter().map(String::as_str));
        writer
            .write_record(&header)
            .map_err(|e| IoError::Csv(e.to_string()))?;
    }

    for (idx, record) in table.records.iter().enumerate() {
        let id = group_of
            .get(&record.key)
            .map(|g| g.to_string())
            .unwrap_or_default();

        let mut row: Vec<&str> = Vec::with_capacity(record.fields.len() + 1);
        row.push(&id);
        row.extend(record.fields.iter().map(|(_, v)| v.as_deref().unwrap_or("")));
        if let Some(extra) = table.overflow.get(idx) {
            row.extend(extra.iter().map(String::as_str));
        }
        writer
            .write_record(&row)
            .map_err(|e| IoError::Csv(e.to_string()))?;
    }

    writer.flush().map_err(|e| IoError::Csv(e.to_string()))?;
    Ok(())
}
