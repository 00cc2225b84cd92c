use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("backend responded {status}: {message}")]
    StatusError {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::StatusError { status, .. } => Some(*status),
            Self::RequestError(e) => e.status(),
            Self::SerdeError(_) => None,
        }
    }

    /// Short message suitable for a toast.
    pub fn client_display(&self) -> String {
        match self {
            Self::StatusError { message, .. } if !message.is_empty() => message.clone(),
            Self::StatusError { status, .. } => format!("Request failed ({status})."),
            Self::RequestError(e) if e.is_timeout() => String::from("The server did not respond in time."),
            Self::RequestError(_) => String::from("Unable to reach the server."),
            Self::SerdeError(_) => String::from("The server sent an unexpected response."),
        }
    }
}
