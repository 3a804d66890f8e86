use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the catalog, the config store and the extraction engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad user input: unknown config key, malformed value, empty query.
    #[error("{0}")]
    Validation(String),

    /// The external engine could not be started or reported a failure.
    #[error("{tool}: {message}")]
    ExternalTool { tool: &'static str, message: String },

    /// A catalog operation failed against SQLite. `op` names the operation.
    #[error("catalog {op} failed: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn external(tool: &'static str, message: impl Into<String>) -> Self {
        Error::ExternalTool {
            tool,
            message: message.into(),
        }
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) => 2,
            Error::ExternalTool { .. } => 3,
            Error::Storage { .. } | Error::Config { .. } | Error::Io(_) => 4,
        }
    }
}

/// Attaches the failing catalog operation to a rusqlite error.
pub(crate) trait StorageContext<T> {
    fn during(self, op: &'static str) -> Result<T>;
}

impl<T> StorageContext<T> for std::result::Result<T, rusqlite::Error> {
    fn during(self, op: &'static str) -> Result<T> {
        self.map_err(|source| Error::Storage { op, source })
    }
}
