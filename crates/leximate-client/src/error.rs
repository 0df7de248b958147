use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// 2xx reply whose body carried `success: false`.
    #[error("{endpoint} rejected the request: {message}")]
    Rejected { endpoint: String, message: String },
    #[error("{endpoint} reply is missing `{field}`")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn rejected(endpoint: &str, message: Option<String>) -> Self {
        Self::Rejected {
            endpoint: endpoint.to_string(),
            message: message.unwrap_or_else(|| "no reason given".to_string()),
        }
    }

    pub fn missing(endpoint: &str, field: &'static str) -> Self {
        Self::MissingField {
            endpoint: endpoint.to_string(),
            field,
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not persist session file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
