use std::fmt;

/// Failure of a backend request.
///
/// Each variant maps to a distinct user-facing message via
/// [`ApiError::user_message`]. An empty-but-valid response is not an error;
/// it surfaces as [`crate::resource::ResourceState::Empty`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused, timeout).
    Network(String),
    /// The backend answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The response body was not the expected JSON shape.
    Decode(String),
    /// A 2xx response whose body reports a failure (e.g. forecast `error`).
    Backend(String),
}

impl ApiError {
    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message shown in a view's error state.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the Heliox API. Check that the backend is running.".to_string()
            }
            Self::Status { status, body } => match detail(body) {
                Some(detail) => format!("Request failed with status {status}: {detail}"),
                None => format!("Request failed with status {status}."),
            },
            Self::Decode(_) => "The API returned data in an unexpected format.".to_string(),
            Self::Backend(detail) => format!("The API could not produce this data: {detail}"),
        }
    }
}

/// The backend's `{"detail": "..."}` message, when the body carries one.
fn detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?.as_str()?.trim();
    (!detail.is_empty()).then(|| detail.to_string())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(detail) => write!(f, "network error: {detail}"),
            Self::Status { status, .. } => write!(f, "API request failed: {status}"),
            Self::Decode(detail) => write!(f, "invalid API response: {detail}"),
            Self::Backend(detail) => write!(f, "backend error: {detail}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_distinct_per_kind() {
        let network = ApiError::Network("refused".into()).user_message();
        let status = ApiError::Status {
            status: 502,
            body: String::new(),
        }
        .user_message();
        let decode = ApiError::Decode("eof".into()).user_message();
        assert_ne!(network, status);
        assert_ne!(status, decode);
        assert!(status.contains("502"));
    }

    #[test]
    fn status_message_includes_backend_detail() {
        let err = ApiError::Status {
            status: 400,
            body: r#"{"detail":"Not enough history to forecast gpu_type=h100"}"#.into(),
        };
        assert_eq!(
            err.user_message(),
            "Request failed with status 400: Not enough history to forecast gpu_type=h100"
        );

        // Validation errors carry a list, not a string.
        let err = ApiError::Status {
            status: 422,
            body: r#"{"detail":[{"loc":["query","start"],"msg":"invalid date"}]}"#.into(),
        };
        assert_eq!(err.user_message(), "Request failed with status 422.");

        let err = ApiError::Status {
            status: 502,
            body: "<html>Bad Gateway</html>".into(),
        };
        assert_eq!(err.user_message(), "Request failed with status 502.");
    }

    #[test]
    fn status_accessor() {
        let err = ApiError::Status {
            status: 409,
            body: "{}".into(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(ApiError::Network("x".into()).status(), None);
        assert_eq!(err.to_string(), "API request failed: 409");
    }
}
