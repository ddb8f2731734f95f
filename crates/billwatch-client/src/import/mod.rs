mod parse;
mod persist;

use std::path::Path;

use crate::ClientResult;
use crate::contracts::types::{ImportIssue, ImportSummary};
use crate::detect::dates::{format_iso_datetime, parse_transaction_datetime};
use crate::error::ClientError;
use crate::import::parse::{ParsedRow, parse_source};

/// A fully validated row, ready for insertion. `posted_at` is
/// re-serialized to canonical ISO form so stored timestamps are uniform
/// regardless of the source file's shape.
#[derive(Debug, Clone)]
pub(crate) struct CanonicalTransaction {
    pub(crate) account_id: String,
    pub(crate) posted_at: String,
    pub(crate) amount: f64,
    pub(crate) description: String,
    pub(crate) merchant: Option<String>,
    pub(crate) icon_url: Option<String>,
    pub(crate) category_color: Option<String>,
    pub(crate) category_icon_lib: Option<String>,
    pub(crate) category_icon_name: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ImportOutcome {
    pub(crate) import_id: Option<String>,
    pub(crate) summary: ImportSummary,
}

pub(crate) fn run(db_path: &Path, content: &str, dry_run: bool) -> ClientResult<ImportOutcome> {
    let parsed_rows = parse_source(content)?;
    let rows_read = parsed_rows.len() as i64;

    let (canonical_rows, issues) = validate_rows(&parsed_rows);
    let rows_invalid = (parsed_rows.len() - canonical_rows.len()) as i64;
    let summary = ImportSummary {
        rows_read,
        rows_valid: canonical_rows.len() as i64,
        rows_invalid,
        inserted: 0,
    };

    if !issues.is_empty() {
        return Err(ClientError::import_validation_failed(summary, issues));
    }

    if dry_run {
        return Ok(ImportOutcome {
            import_id: None,
            summary,
        });
    }

    let persisted = persist::persist_rows(db_path, &canonical_rows)?;
    Ok(ImportOutcome {
        import_id: Some(persisted.import_id),
        summary: ImportSummary {
            inserted: persisted.inserted,
            ..summary
        },
    })
}

fn validate_rows(rows: &[ParsedRow]) -> (Vec<CanonicalTransaction>, Vec<ImportIssue>) {
    let mut canonical_rows = Vec::new();
    let mut issues = Vec::new();

    for row in rows {
        let mut row_issues = Vec::new();

        let account_id = require_text(row, &row.account_id, "account_id", &mut row_issues);
        let description = require_text(row, &row.description, "description", &mut row_issues);

        let posted_at = match row.posted_at.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => match parse_transaction_datetime(value) {
                Some(parsed) => Some(format_iso_datetime(&parsed)),
                None => {
                    row_issues.push(issue_with_expected(
                        row.row,
                        "posted_at",
                        "invalid_timestamp",
                        "posted_at must be YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS.",
                        "YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
                        Some(value),
                    ));
                    None
                }
            },
            _ => {
                row_issues.push(issue(
                    row.row,
                    "posted_at",
                    "missing_required_field",
                    "posted_at is required.",
                    None,
                ));
                None
            }
        };

        let amount = match row.amount.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => match value.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Some(parsed),
                _ => {
                    row_issues.push(issue_with_expected(
                        row.row,
                        "amount",
                        "invalid_amount",
                        "amount must be a signed number (negative = expense).",
                        "a finite number",
                        Some(value),
                    ));
                    None
                }
            },
            _ => {
                row_issues.push(issue(
                    row.row,
                    "amount",
                    "missing_required_field",
                    "amount is required.",
                    None,
                ));
                None
            }
        };

        match (account_id, posted_at, amount, description) {
            (Some(account_id), Some(posted_at), Some(amount), Some(description))
                if row_issues.is_empty() =>
            {
                canonical_rows.push(CanonicalTransaction {
                    account_id,
                    posted_at,
                    amount,
                    description,
                    merchant: clean_optional(&row.merchant),
                    icon_url: clean_optional(&row.icon_url),
                    category_color: clean_optional(&row.category_color),
                    category_icon_lib: clean_optional(&row.category_icon_lib),
                    category_icon_name: clean_optional(&row.category_icon_name),
                });
            }
            _ => issues.extend(row_issues),
        }
    }

    (canonical_rows, issues)
}

fn require_text(
    row: &ParsedRow,
    value: &Option<String>,
    field_name: &str,
    row_issues: &mut Vec<ImportIssue>,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            row_issues.push(issue(
                row.row,
                field_name,
                "missing_required_field",
                &format!("{field_name} is required."),
                None,
            ));
            None
        }
    }
}

fn issue(
    row: i64,
    field: &str,
    code: &str,
    description: &str,
    received: Option<&str>,
) -> ImportIssue {
    ImportIssue {
        row,
        field: field.to_string(),
        code: code.to_string(),
        description: description.to_string(),
        expected: None,
        received: received.map(std::string::ToString::to_string),
    }
}

fn issue_with_expected(
    row: i64,
    field: &str,
    code: &str,
    description: &str,
    expected: &str,
    received: Option<&str>,
) -> ImportIssue {
    ImportIssue {
        expected: Some(expected.to_string()),
        ..issue(row, field, code, description, received)
    }
}

fn clean_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(std::string::ToString::to_string)
}
