use axum::BoxError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Unsupported signing algorithm: {0}")]
    Algorithm(String),
    #[error("Token lifetime must be a positive number of hours, got {0}")]
    Lifetime(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token signing error: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("Token subject must not be empty")]
    EmptySubject,
    #[error("Token lifetime out of range")]
    Lifetime,
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Header decode error: {0}")]
    HeaderDecode(#[from] axum::http::header::ToStrError),
}

impl Error {
    /// Server-side faults, as opposed to anything the caller can fix by
    /// presenting different credentials.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Signing(_) | Error::EmptySubject | Error::Lifetime
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!("{:?}", self);
        } else {
            tracing::debug!("{:?}", self);
        }

        let (status, message) = match self {
            Error::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            Error::Signing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            Error::EmptySubject => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            Error::Lifetime => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            Error::NoCredentials => (StatusCode::UNAUTHORIZED, "No credentials provided"),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Incorrect credentials"),
            Error::HeaderDecode(_) => (StatusCode::BAD_REQUEST, "Header decode error"),
        };

        (status, message).into_response()
    }
}

pub(crate) async fn handle_middleware_errors(err: BoxError) -> (StatusCode, &'static str) {
    tracing::error!("Unhandled error: {:?}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
