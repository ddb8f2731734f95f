use std::collections::HashMap;

use serde_json::Value;

use crate::{ClientError, ClientResult};

pub(crate) const REQUIRED_FIELDS: [&str; 4] = ["account_id", "posted_at", "amount", "description"];
pub(crate) const OPTIONAL_FIELDS: [&str; 5] = [
    "merchant",
    "icon_url",
    "category_color",
    "category_icon_lib",
    "category_icon_name",
];

#[derive(Debug, Clone)]
pub(crate) struct ParsedRow {
    pub(crate) row: i64,
    pub(crate) account_id: Option<String>,
    pub(crate) posted_at: Option<String>,
    pub(crate) amount: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) merchant: Option<String>,
    pub(crate) icon_url: Option<String>,
    pub(crate) category_color: Option<String>,
    pub(crate) category_icon_lib: Option<String>,
    pub(crate) category_icon_name: Option<String>,
}

pub(crate) fn parse_source(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_argument("Import source is empty."));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed);
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_import_format(
            "JSON input must be a top-level array of transaction objects.",
            "json_non_array",
        ));
    }

    Err(ClientError::invalid_import_format(
        "Unsupported import format. Provide a JSON array or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let parsed = serde_json::from_str::<Value>(content).map_err(|_| {
        ClientError::invalid_argument("Invalid JSON input. Provide a valid JSON array.")
    })?;

    let Some(items) = parsed.as_array() else {
        return Err(ClientError::invalid_import_format(
            "JSON input must be a top-level array of transaction objects.",
            "json_non_array",
        ));
    };

    let mut rows = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(object) = item.as_object() else {
            return Err(ClientError::invalid_argument(
                "JSON array entries must all be objects with transaction fields.",
            ));
        };

        rows.push(ParsedRow {
            row: (index as i64) + 1,
            account_id: read_optional_string(object.get("account_id")),
            posted_at: read_optional_string(object.get("posted_at")),
            amount: read_optional_string(object.get("amount")),
            description: read_optional_string(object.get("description")),
            merchant: read_optional_string(object.get("merchant")),
            icon_url: read_optional_string(object.get("icon_url")),
            category_color: read_optional_string(object.get("category_color")),
            category_icon_lib: read_optional_string(object.get("category_icon_lib")),
            category_icon_name: read_optional_string(object.get("category_icon_name")),
        });
    }

    Ok(rows)
}

fn parse_csv(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| ClientError::invalid_argument("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers) {
        return Err(ClientError::import_schema_mismatch(
            REQUIRED_FIELDS.iter().map(|value| value.to_string()).collect(),
            OPTIONAL_FIELDS.iter().map(|value| value.to_string()).collect(),
            headers,
        ));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.to_string(), index))
        .collect::<HashMap<String, usize>>();

    let mut rows = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record = result_row
            .map_err(|_| ClientError::invalid_argument("CSV rows are malformed or not UTF-8."))?;

        rows.push(ParsedRow {
            row: (row_index as i64) + 1,
            account_id: value_for(&record, &index_by_name, "account_id"),
            posted_at: value_for(&record, &index_by_name, "posted_at"),
            amount: value_for(&record, &index_by_name, "amount"),
            description: value_for(&record, &index_by_name, "description"),
            merchant: value_for(&record, &index_by_name, "merchant"),
            icon_url: value_for(&record, &index_by_name, "icon_url"),
            category_color: value_for(&record, &index_by_name, "category_color"),
            category_icon_lib: value_for(&record, &index_by_name, "category_icon_lib"),
            category_icon_name: value_for(&record, &index_by_name, "category_icon_name"),
        });
    }

    Ok(rows)
}

fn value_for(
    record: &csv::StringRecord,
    index_by_name: &HashMap<String, usize>,
    field_name: &str,
) -> Option<String> {
    let index = index_by_name.get(field_name)?;
    let value = record.get(*index)?;
    if value.trim().is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn read_optional_string(value: Option<&Value>) -> Option<String> {
    let current = value?;

    if current.is_null() {
        return None;
    }

    if let Some(string_value) = current.as_str() {
        return Some(string_value.to_string());
    }

    if let Some(number_value) = current.as_f64() {
        return Some(number_value.to_string());
    }

    Some(current.to_string())
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}

fn headers_are_valid(actual_headers: &[String]) -> bool {
    for required in REQUIRED_FIELDS {
        if !actual_headers.iter().any(|value| value == required) {
            return false;
        }
    }

    for header in actual_headers {
        let allowed = REQUIRED_FIELDS.iter().any(|value| value == header)
            || OPTIONAL_FIELDS.iter().any(|value| value == header);
        if !allowed {
            return false;
        }
    }

    true
}
