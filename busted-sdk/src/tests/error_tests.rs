//! Tests for error handling functionality
//!
//! These tests verify that the error system in the SDK works correctly.

#[cfg(test)]
mod tests {
    use crate::error::{mapping, ClientError};

    #[test]
    fn test_client_error_accessors() {
        let transport = ClientError::transport("Connection refused");
        let http = ClientError::http(500, "index unavailable");
        let decode = ClientError::decode(Some(200), "Malformed JSON response");

        assert_eq!(transport.message(), "Connection refused");
        assert_eq!(transport.http_status(), None);
        assert!(transport.is_transport());

        assert_eq!(http.message(), "index unavailable");
        assert_eq!(http.http_status(), Some(500));
        assert!(!http.is_transport());

        assert_eq!(decode.http_status(), Some(200));
        assert_eq!(decode.kind(), "decode");
    }

    #[test]
    fn test_display_adds_kind() {
        assert_eq!(
            ClientError::http(503, "Service Unavailable").to_string(),
            "HTTP 503: Service Unavailable"
        );
        assert_eq!(
            ClientError::transport("timed out").to_string(),
            "Transport error: timed out"
        );
        assert_eq!(
            ClientError::configuration("Base URL is required").to_string(),
            "Configuration error: Base URL is required"
        );
    }

    #[test]
    fn test_serde_errors_become_request_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let client_error = ClientError::from(err);
        assert!(matches!(client_error, ClientError::Request(_)));
    }

    #[test]
    fn test_fallback_message_is_never_empty() {
        for status in [400u16, 401, 404, 418, 500, 503, 520] {
            for body in ["", "not json", "{}", "{\"message\": \"\"}", "[]"] {
                let err = mapping::map_http_error(status, None, body);
                assert!(!err.message().is_empty(), "status {} body {:?}", status, body);
                assert_eq!(err.http_status(), Some(status));
            }
        }
    }

    #[test]
    fn test_message_preferred_over_detail() {
        let err = mapping::map_http_error(
            400,
            None,
            r#"{"detail": "validation failed", "message": "bad query"}"#,
        );
        assert_eq!(err.message(), "bad query");
    }
}
