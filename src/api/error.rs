use axum::http::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("options must contain at least one option")]
    NoOptions,

    #[error("too many options: {count} given, at most {max} can be compared")]
    TooManyOptions { count: usize, max: usize },

    #[error("{label}: fixed term of {months} months exceeds the {max}-month limit")]
    TermTooLong { label: String, months: u32, max: u32 },

    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoOptions
            | ApiError::TooManyOptions { .. }
            | ApiError::TermTooLong { .. }
            | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidJson(err.to_string())
    }
}
