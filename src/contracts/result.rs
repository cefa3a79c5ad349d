//! The success/error envelope exchanged with the backend.
//!
//! Services never return `Err` across the contract boundary; they answer with
//! an [`ApiResult`] that carries either `data` or an [`ErrorResult`].

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A structured error returned inside an [`ApiResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message} ({code})")]
pub struct ErrorResult {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResult {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            context: None,
            details: None,
        }
    }

    /// Attach caller context (for example the offending request).
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Envelope metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Wire shape of every service response.
///
/// Exactly one of `data` or `error` is populated by the constructors here;
/// envelopes deserialized from elsewhere may be sloppier, which
/// [`ApiResult::into_result`] accounts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResultMeta>,
}

impl<T> ApiResult<T> {
    /// A successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: Some(true),
            data: Some(data),
            error: None,
            message: None,
            meta: Some(stamp()),
        }
    }

    /// A failed envelope around `error`.
    pub fn err(error: ErrorResult) -> Self {
        Self {
            success: Some(false),
            data: None,
            error: Some(error),
            message: None,
            meta: Some(stamp()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether `data` can be read.
    pub fn is_success(&self) -> bool {
        self.success != Some(false) && self.error.is_none() && self.data.is_some()
    }

    /// Convert into a standard `Result`, the only sanctioned way to read `data`.
    pub fn into_result(self) -> Result<T, ErrorResult> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match (self.success, self.data) {
            (Some(false), _) => Err(ErrorResult::new(
                self.message
                    .unwrap_or_else(|| "operation reported failure".to_string()),
                "UNKNOWN_ERROR",
            )),
            (_, Some(data)) => Ok(data),
            (_, None) => Err(ErrorResult::new(
                "result carried neither data nor error",
                "EMPTY_RESULT",
            )),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        ApiResult {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            message: self.message,
            meta: self.meta,
        }
    }
}

impl<T, E> From<Result<T, E>> for ApiResult<T>
where
    E: Into<ErrorResult>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.into()),
        }
    }
}

fn stamp() -> ResultMeta {
    ResultMeta {
        timestamp: Some(Utc::now().to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let result = ApiResult::ok(42);
        assert!(result.is_success());
        assert!(result.meta.as_ref().unwrap().timestamp.is_some());
        assert_eq!(result.into_result(), Ok(42));
    }

    #[test]
    fn test_err_envelope() {
        let result: ApiResult<u32> = ApiResult::err(ErrorResult::new("boom", "E_BOOM"));
        assert!(!result.is_success());
        assert_eq!(result.into_result().unwrap_err().code, "E_BOOM");
    }

    #[test]
    fn test_wire_shape_skips_absent_fields() {
        let result: ApiResult<u32> =
            ApiResult::err(ErrorResult::new("missing", "NOT_FOUND").with_context(json!({"id": 7})));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(false));
        assert!(value.get("data").is_none());
        assert_eq!(value["error"]["code"], json!("NOT_FOUND"));
        assert_eq!(value["error"]["context"]["id"], json!(7));
        assert!(value["error"].get("details").is_none());
    }

    #[test]
    fn test_parse_backend_payload() {
        let raw = r#"{"data": {"name": "x"}, "meta": {"timestamp": "2024-05-01T10:00:00Z"}}"#;
        let result: ApiResult<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert!(result.is_success());
        assert_eq!(result.into_result().unwrap()["name"], json!("x"));
    }

    #[test]
    fn test_empty_envelope_is_an_error() {
        let result: ApiResult<u8> = serde_json::from_str("{}").unwrap();
        assert!(!result.is_success());
        assert_eq!(result.into_result().unwrap_err().code, "EMPTY_RESULT");
    }

    #[test]
    fn test_success_false_without_error() {
        let raw = r#"{"success": false, "data": 1, "message": "nope"}"#;
        let result: ApiResult<u8> = serde_json::from_str(raw).unwrap();
        let err = result.into_result().unwrap_err();
        assert_eq!(err.message, "nope");
    }

    #[test]
    fn test_from_std_result() {
        let ok: Result<u8, ErrorResult> = Ok(3);
        assert_eq!(ApiResult::from(ok).data, Some(3));
    }
}
