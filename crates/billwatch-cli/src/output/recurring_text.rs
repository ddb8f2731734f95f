use std::io;

use serde_json::Value;

use super::format::{self, Align, Column};

pub fn render_recurring(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("recurring output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No recurring payments found.",
            "",
            "Billwatch needs at least three charges from the same biller inside",
            "the detection window. Import more transaction history and rerun.",
        ]
        .join("\n"));
    }

    let as_of = data.get("as_of").and_then(Value::as_str);
    let heading = match as_of {
        Some(clock) => format!(
            "{} recurring payments detected as of {}.",
            rows.len(),
            date_part(clock)
        ),
        None => format!("{} recurring payments detected.", rows.len()),
    };

    let mut lines = vec![heading, String::new(), "Upcoming:".to_string()];

    let columns = [
        Column {
            name: "Label",
            align: Align::Left,
        },
        Column {
            name: "Cadence",
            align: Align::Left,
        },
        Column {
            name: "Avg Amount",
            align: Align::Right,
        },
        Column {
            name: "Last",
            align: Align::Left,
        },
        Column {
            name: "Next",
            align: Align::Left,
        },
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                string_cell(row, "label"),
                string_cell(row, "cadence"),
                format_average_amount(row),
                date_cell(row, "last_date"),
                date_cell(row, "next_date"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    lines.extend(format::render_table(&columns, &table_rows));

    Ok(lines.join("\n"))
}

fn string_cell(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn date_cell(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .map(date_part)
        .unwrap_or_else(|| "unknown".to_string())
}

fn format_average_amount(row: &Value) -> String {
    let amount = row
        .get("average_amount")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    format!("{amount}")
}

/// Timestamps in the payload are `YYYY-MM-DDTHH:MM:SS`; the table only
/// shows the calendar date.
fn date_part(timestamp: &str) -> String {
    timestamp
        .split('T')
        .next()
        .unwrap_or(timestamp)
        .to_string()
}
