#![forbid(unsafe_code)]

use crate::ServiceError;
use crate::identity::{IdentityProvider, require_user};
use crate::resolver::CategoryResolver;
use lt_storage::{NewAchievement, SqliteStore};
use serde::Serialize;
use std::collections::BTreeSet;

/// Columns every import must carry and every export produces, in
/// export order.
pub const REQUIRED_COLUMNS: [&str; 3] = ["title", "description", "category"];

/// Category marker written on export when the stored reference cannot
/// be resolved (legacy rows with a missing or dropped category).
const UNKNOWN_CATEGORY: &str = "Unknown";

const BOM: char = '\u{feff}';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: u64,
}

/// Bulk-loads achievement definitions from tabular text. The header is
/// validated before any row is read, and the whole batch is inserted in
/// one transaction: a bad row means nothing is imported. Imported
/// achievements are system-defined (`custom_achievement = false`), and
/// a category name with no matching category rejects the import.
pub fn import_catalog(
    store: &mut SqliteStore,
    identity: &dyn IdentityProvider,
    text: &str,
) -> Result<ImportReport, ServiceError> {
    require_user(identity)?;

    let text = text.strip_prefix(BOM).unwrap_or(text);
    let records = parse_csv(text).map_err(|err| ServiceError::ValidationFailed(err.to_string()))?;
    let Some((header, data)) = records.split_first() else {
        return Err(ServiceError::ValidationFailed(
            "import payload is empty".to_string(),
        ));
    };

    let header: Vec<String> = header.iter().map(|column| column.trim().to_string()).collect();
    let indexes: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|required| header.iter().position(|column| column == required))
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .zip(&indexes)
        .filter(|(_, index)| index.is_none())
        .map(|(column, _)| *column)
        .collect();
    let [Some(title_index), Some(description_index), Some(category_index)] = indexes[..] else {
        return Err(ServiceError::ValidationFailed(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    };
    if data.is_empty() {
        return Err(ServiceError::ValidationFailed(
            "import payload has no data rows".to_string(),
        ));
    }

    let resolver = CategoryResolver::load(store)?;
    let mut rows = Vec::with_capacity(data.len());
    let mut unknown_categories = BTreeSet::new();
    for (offset, record) in data.iter().enumerate() {
        let line = offset + 2;
        if record.len() != header.len() {
            return Err(ServiceError::ValidationFailed(format!(
                "row {line} has {} fields, expected {}",
                record.len(),
                header.len()
            )));
        }

        let title = record[title_index].trim();
        if title.is_empty() {
            return Err(ServiceError::ValidationFailed(format!(
                "row {line} has an empty title"
            )));
        }

        let category_name = record[category_index].trim();
        match resolver.id_for_name(category_name) {
            Some(category_id) => rows.push(NewAchievement {
                title: title.to_string(),
                description: record[description_index].trim().to_string(),
                category_id: Some(category_id.to_string()),
            }),
            None => {
                unknown_categories.insert(category_name.to_string());
            }
        }
    }
    if !unknown_categories.is_empty() {
        let names: Vec<String> = unknown_categories.into_iter().collect();
        return Err(ServiceError::ValidationFailed(format!(
            "unknown categories: {}",
            names.join(", ")
        )));
    }

    let imported = store.insert_achievements_batch(rows)?;
    Ok(ImportReport { imported })
}

/// Serializes the catalog to the import header set, newest entries
/// first, category identifiers resolved back to display names. The
/// output starts with a byte-order mark so spreadsheet tools keep
/// non-ASCII text intact.
pub fn export_catalog(
    store: &SqliteStore,
    identity: &dyn IdentityProvider,
) -> Result<String, ServiceError> {
    require_user(identity)?;

    let resolver = CategoryResolver::load(store)?;
    let achievements = store.list_achievements()?;

    let mut out = String::new();
    out.push(BOM);
    push_record(&mut out, &REQUIRED_COLUMNS);
    for row in achievements {
        let category = row
            .category_id
            .as_deref()
            .and_then(|id| resolver.name_for_id(id))
            .unwrap_or(UNKNOWN_CATEGORY);
        push_record(&mut out, &[&row.title, &row.description, category]);
    }
    Ok(out)
}

fn push_record(out: &mut String, fields: &[&str]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push('\n');
}

fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Debug)]
enum CsvParseError {
    UnterminatedQuote { line: usize },
}

impl std::fmt::Display for CsvParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedQuote { line } => {
                write!(f, "unterminated quoted field starting on line {line}")
            }
        }
    }
}

/// Minimal comma-separated reader: quoted fields, doubled quotes,
/// LF or CRLF record ends. Blank records are skipped the way the
/// interchange format's producers skip them.
fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, CsvParseError> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_opened_on = 1usize;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                other => field.push(other),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_opened_on = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            other => field.push(other),
        }
    }

    if in_quotes {
        return Err(CsvParseError::UnterminatedQuote {
            line: quote_opened_on,
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records.retain(|record| !(record.len() == 1 && record[0].is_empty()));
    Ok(records)
}
