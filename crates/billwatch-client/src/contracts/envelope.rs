use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// Machine contract for a successful command. `data` carries the
/// command's own payload (`ImportData` for `import`, `RecurringData`
/// for `recurring`), serialized eagerly so a payload that cannot be
/// serialized fails inside the command rather than at print time.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

impl SuccessEnvelope {
    pub fn for_command<T>(command: &str, data: T) -> ClientResult<Self>
    where
        T: Serialize,
    {
        let data = serde_json::to_value(data)
            .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
        Ok(Self {
            ok: true,
            command: command.to_string(),
            version: API_VERSION.to_string(),
            data,
        })
    }
}

/// Machine contract for a failed command. `data` is whatever detail
/// payload the error attached (import issues, header mismatches) and
/// is omitted from the serialized form when absent.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

impl From<&ClientError> for ErrorContract {
    fn from(error: &ClientError) -> Self {
        Self {
            code: error.code.clone(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
        }
    }
}

impl From<&ClientError> for FailureEnvelope {
    fn from(error: &ClientError) -> Self {
        Self {
            ok: false,
            error: ErrorContract::from(error),
            data: error.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ClientError;

    use super::{FailureEnvelope, SuccessEnvelope};

    #[test]
    fn success_envelope_wraps_payload_with_crate_version() {
        let envelope = SuccessEnvelope::for_command("recurring", json!({"rows": []}));
        assert!(envelope.is_ok());
        if let Ok(value) = envelope {
            assert!(value.ok);
            assert_eq!(value.command, "recurring");
            assert_eq!(value.version, env!("CARGO_PKG_VERSION"));
            assert!(value.data["rows"].is_array());
        }
    }

    #[test]
    fn failure_envelope_mirrors_the_error_taxonomy() {
        let bare = ClientError::invalid_argument("bad input");
        let envelope = FailureEnvelope::from(&bare);
        assert!(!envelope.ok);
        assert_eq!(envelope.error.code, "invalid_argument");
        assert!(!envelope.error.recovery_steps.is_empty());
        assert!(envelope.data.is_none());
    }

    #[test]
    fn failure_envelope_keeps_attached_error_data() {
        let error = ClientError::invalid_argument("bad rows")
            .with_data(json!({"issues": [{"row": 2, "field": "amount"}]}));
        let envelope = FailureEnvelope::from(&error);
        assert!(envelope.data.is_some());
        if let Some(data) = envelope.data {
            assert_eq!(data["issues"][0]["row"], 2);
        }
    }
}
