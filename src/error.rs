use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} is corrupt: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TrainerError {
    /// Session text and timeline disagree; the session is not saved.
    #[error("length of text ({text_len}) does not match length of timeline ({timeline_len}), stats not saved")]
    Validation { text_len: usize, timeline_len: usize },

    #[error("not enough data yet ({reason}), train normally first")]
    InsufficientData { reason: String },

    #[error("{source_name} contains no usable data")]
    InvalidSource { source_name: String },

    #[error("failed to read {source_name}: {source}")]
    Read {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid word pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TrainerError {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }
}
