use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PrepError>;

/// Failures raised by the preprocessing stages.
///
/// Variants fall into three classes: configuration (pattern file problems),
/// I/O (anything touching the input or output trees) and parse (gold-standard
/// filenames that are not document ids).
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    #[error("cannot read pattern file {path}: {source}")]
    PatternFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no header patterns found in {0}")]
    EmptyPatternSet(String),

    #[error("invalid header pattern: {0}")]
    PatternCompile(#[from] regex::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("topic directory name is not valid UTF-8: {0}")]
    TopicName(PathBuf),

    #[error("invalid document id {name:?} in topic {topic}")]
    InvalidDocId { topic: String, name: String },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PrepError::Io { path: path.into(), source }
    }

    /// True for errors that abort before any document is touched.
    pub fn is_config(&self) -> bool {
        matches!(self, PrepError::PatternFile { .. } | PrepError::EmptyPatternSet(_) | PrepError::PatternCompile(_))
    }
}
