use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppErrorCode {
    Validation,
    Auth,
    Api,
    Network,
    Protocol,
    Storage,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: AppErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: Some(crate::observability::trace_id().to_string()),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// A required field failed local validation; no request was made.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Validation, message)
    }

    /// The action needs an active session.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Auth, message)
    }

    /// The backend answered outside 2xx; the message is the body's `error`
    /// field when one was present.
    pub fn api(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Api, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Network, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Protocol, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Storage, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            AppError::protocol("Malformed server response").with_details(value.to_string())
        } else {
            AppError::network("Failed to reach server").with_details(value.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::protocol("Invalid JSON payload").with_details(value.to_string())
    }
}

impl From<crate::session::SessionStoreError> for AppError {
    fn from(value: crate::session::SessionStoreError) -> Self {
        AppError::storage("Session storage failure").with_details(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_error_payload_shape() {
        let err = AppError::api("user not found").with_details("status 404");
        let json = serde_json::to_value(err).expect("serialize app error");

        assert_eq!(json["code"], "api");
        assert_eq!(json["message"], "user not found");
        assert_eq!(json["details"], "status 404");
        assert!(json.get("trace_id").is_some());
    }

    #[test]
    fn json_parse_failures_map_to_protocol() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err = AppError::from(parse_err);
        assert_eq!(err.code, AppErrorCode::Protocol);
    }
}
