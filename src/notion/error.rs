//! Error types for Notion API access

/// Error from a Notion API call
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    /// A required credential (token or database id) is not configured
    #[error("missing Notion credential: {0}")]
    MissingCredential(&'static str),

    /// Transport-level failure (connection, timeout, TLS)
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for NotionError {
    fn from(e: serde_json::Error) -> Self {
        NotionError::Decode(e.to_string())
    }
}

impl NotionError {
    /// Whether the error means the requested object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, NotionError::Api { status: 404, .. })
            || matches!(self, NotionError::Api { code, .. } if code == "object_not_found")
    }
}

/// Result alias for Notion operations
pub type Result<T> = std::result::Result<T, NotionError>;
