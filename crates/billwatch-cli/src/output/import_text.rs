use std::io;

use serde_json::Value;

use super::format;

pub fn render_import_run(data: &Value) -> io::Result<String> {
    let dry_run = data
        .get("dry_run")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let summary = data
        .get("summary")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("import output requires summary"))?;

    let mut lines = Vec::new();
    if dry_run {
        lines.push("Dry-run validation completed successfully.".to_string());
    } else {
        lines.push("Import completed successfully.".to_string());
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());

    let mut entries = Vec::new();
    if !dry_run {
        let import_id = data
            .get("import_id")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        entries.push(("Import ID:", import_id.to_string()));
    }

    entries.push(("Rows read:", get_i64(summary, "rows_read").to_string()));
    entries.push(("Rows valid:", get_i64(summary, "rows_valid").to_string()));
    entries.push((
        "Rows invalid:",
        get_i64(summary, "rows_invalid").to_string(),
    ));
    entries.push(("Inserted:", get_i64(summary, "inserted").to_string()));

    lines.extend(format::key_value_rows(&entries, 2));

    if let Some(range) = render_data_range(data) {
        lines.push(String::new());
        lines.push(range);
    }

    if dry_run {
        lines.push(String::new());
        lines.push("No rows were written because this was a dry run.".to_string());
        lines.push(String::new());
        lines.push("What to do next:".to_string());
        lines.push("  1. Rerun without --dry-run to commit the import.".to_string());
    } else {
        lines.push(String::new());
        lines.push("What to do next:".to_string());
        lines.push("  1. Run `billwatch recurring` to detect recurring payments.".to_string());
    }

    Ok(lines.join("\n"))
}

fn render_data_range(data: &Value) -> Option<String> {
    let range = data.get("data_range")?;
    let earliest = range.get("earliest").and_then(Value::as_str)?;
    let latest = range.get("latest").and_then(Value::as_str)?;
    Some(format!("Ledger now covers {earliest} to {latest}."))
}

fn get_i64(summary: &serde_json::Map<String, Value>, key: &str) -> i64 {
    summary.get(key).and_then(Value::as_i64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_import_run;

    #[test]
    fn committed_import_reports_id_counts_and_coverage() {
        let data = json!({
            "dry_run": false,
            "import_id": "imp_01ABC",
            "summary": {"rows_read": 3, "rows_valid": 3, "rows_invalid": 0, "inserted": 3},
            "data_range": {"earliest": "2026-01-21T00:00:00", "latest": "2026-03-22T00:00:00"}
        });

        let rendered = render_import_run(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Import completed successfully."));
            assert!(text.contains("Import ID:"));
            assert!(text.contains("imp_01ABC"));
            assert!(text.contains("Ledger now covers 2026-01-21T00:00:00 to 2026-03-22T00:00:00."));
            assert!(text.contains("billwatch recurring"));
        }
    }

    #[test]
    fn dry_run_omits_import_id_and_flags_no_writes() {
        let data = json!({
            "dry_run": true,
            "import_id": null,
            "summary": {"rows_read": 2, "rows_valid": 2, "rows_invalid": 0, "inserted": 0},
            "data_range": {"earliest": null, "latest": null}
        });

        let rendered = render_import_run(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Dry-run validation completed successfully."));
            assert!(!text.contains("Import ID:"));
            assert!(text.contains("No rows were written because this was a dry run."));
        }
    }

    #[test]
    fn missing_summary_is_an_output_error() {
        let data = json!({"dry_run": false});
        assert!(render_import_run(&data).is_err());
    }
}
