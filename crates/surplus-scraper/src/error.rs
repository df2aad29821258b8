use thiserror::Error;

/// Coarse failure class used by the retry policy and by batch reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, proxy, HTTP status, or session setup failure.
    Transport,
    /// The response arrived but did not have the expected shape.
    Format,
    /// Not worth retrying: retries already spent, runaway pagination, bad input.
    Fatal,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("session initialisation failed for {url}: {reason}")]
    Session { url: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed {context}: {reason}")]
    Parse { context: String, reason: String },

    #[error("reference list names {references} auctions but the detail page has {records}")]
    ReferenceMismatch { references: usize, records: usize },

    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ScraperError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::Session { .. } => {
                ErrorKind::Transport
            }
            Self::Deserialize { .. } | Self::Parse { .. } | Self::ReferenceMismatch { .. } => {
                ErrorKind::Format
            }
            Self::RetriesExhausted { .. }
            | Self::PaginationLimit { .. }
            | Self::InvalidUrl { .. } => ErrorKind::Fatal,
        }
    }

    /// Transport and format failures are retried with the same budget.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Format)
    }

    pub(crate) fn parse(context: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            context: context.to_owned(),
            reason: reason.into(),
        }
    }
}
