use std::io;

use billwatch_client::{ClientError, FailureEnvelope, SuccessEnvelope};
use serde::Serialize;
use serde_json::{Value, json};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        "import" => render_import_json(&success.data),
        "recurring" => render_recurring_json(&success.data),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&FailureEnvelope::from(error))
}

fn render_import_json(data: &Value) -> Value {
    json!({
        "ok": true,
        "version": JSON_VERSION,
        "data": data.clone()
    })
}

fn render_recurring_json(data: &Value) -> Value {
    json!({
        "as_of": data.get("as_of").cloned().unwrap_or(Value::Null),
        "policy_version": data.get("policy_version").cloned().unwrap_or(Value::Null),
        "rows": data.get("rows").cloned().unwrap_or_else(|| json!([])),
    })
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
