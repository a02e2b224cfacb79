//! What the gateway sends back to the caller.

use axum::http::StatusCode;
use serde_json::Value;

use crate::proxy::error::ProxyError;

/// Status and JSON body relayed to the caller.
///
/// A 2xx only ever comes from [`OutboundResponse::relayed`]; gateway-made
/// responses are always the 500 envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundResponse {
    pub status: StatusCode,
    /// `None` when the backend sent an empty body.
    pub body: Option<Value>,
}

impl OutboundResponse {
    /// A backend response, copied verbatim.
    pub fn relayed(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// The envelope for a failure of the gateway itself.
    pub fn from_error(error: &ProxyError) -> Self {
        let body = serde_json::to_value(error.envelope()).unwrap_or(Value::Null);
        Self {
            status: error.status(),
            body: Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_is_bit_exact() {
        let response = OutboundResponse::from_error(&ProxyError::BackendUnreachable(
            "error sending request: Connection refused".into(),
        ));
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body,
            Some(json!({
                "error": "Internal server error",
                "message": "error sending request: Connection refused"
            }))
        );
    }
}
