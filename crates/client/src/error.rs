use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authenticated, please log in")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Maps a non-success response to an error, using the message of the body
    /// when there is one.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message(body);
        match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(message),
            422 => ClientError::Validation(message),
            _ => ClientError::Server(message),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    error: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|err| err.message.or(err.error))
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_message_or_error_field() {
        let err = ClientError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "amount is required"}"#,
        );
        assert!(matches!(err, ClientError::Validation(msg) if msg == "amount is required"));

        let err = ClientError::from_status(StatusCode::CONFLICT, r#"{"error": "duplicate"}"#);
        assert!(matches!(err, ClientError::Conflict(msg) if msg == "duplicate"));

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "<html>");
        assert!(matches!(err, ClientError::Server(msg) if msg == "unknown error"));
    }

    #[test]
    fn status_mapping() {
        assert!(ClientError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(matches!(
            ClientError::from_status(StatusCode::FORBIDDEN, ""),
            ClientError::Forbidden
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, ""),
            ClientError::NotFound
        ));
    }
}
