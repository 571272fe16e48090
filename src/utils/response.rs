use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope: `{success: true, data, message?, timestamp}`.
///
/// Every handler wraps its payload in this before serialization so the
/// boundary always speaks one shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Error envelope: `{success: false, error: {message, code?, details?}, message, timestamp}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, code: &str) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: ErrorDetail {
                message: message.clone(),
                code: Some(code.to_string()),
                details: None,
            },
            message,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        code: &str,
        details: serde_json::Value,
    ) -> Self {
        let mut response = Self::new(message, code);
        response.error.details = Some(details);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::new(vec![1, 2, 3])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body.get("message").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn success_envelope_carries_message() {
        let body =
            serde_json::to_value(ApiResponse::with_message((), "Created successfully")).unwrap();
        assert_eq!(body["message"], "Created successfully");
    }

    #[test]
    fn error_envelope_shape() {
        let body = serde_json::to_value(ErrorResponse::new("Not found", "NOT_FOUND")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["message"], "Not found");
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert!(body["error"].get("details").is_none());
        assert_eq!(body["message"], "Not found");
    }
}
