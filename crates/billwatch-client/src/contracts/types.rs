use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DataRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_read: i64,
    pub rows_valid: i64,
    pub rows_invalid: i64,
    pub inserted: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportData {
    pub dry_run: bool,
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
    pub message: String,
    pub summary: ImportSummary,
    pub issues: Vec<ImportIssue>,
    pub data_range: DataRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringRow {
    pub key: String,
    pub account_id: String,
    pub label: String,
    pub cadence: String,
    pub average_amount: i64,
    pub last_date: String,
    pub next_date: String,
    pub icon_url: Option<String>,
    pub category_color: Option<String>,
    pub category_icon_lib: Option<String>,
    pub category_icon_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringData {
    pub policy_version: String,
    pub as_of: String,
    pub rows: Vec<RecurringRow>,
    pub data_range: DataRange,
}
