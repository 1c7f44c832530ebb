use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport Error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl StatsError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            StatsError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            StatsError::Status { status, .. } => {
                matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::Status { status: 404, .. })
    }
}

pub type StatsResult<T> = Result<T, StatsError>;
