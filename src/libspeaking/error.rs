use std::fmt;
use std::io;
use thiserror::Error;

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Question,
    Mock,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Question => write!(f, "question"),
            Lookup::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed content: {0}")]
    MalformedContent(String),
    #[error("{kind} {key} not found")]
    NotFound { kind: Lookup, key: i64 },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read content file: {0}")]
    Io(#[from] io::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedContent(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedContent(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
