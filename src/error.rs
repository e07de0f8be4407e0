use std::path::PathBuf;

use thiserror::Error;

use crate::directive::DirectiveError;
use crate::io::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("file does not exist {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("aborted: {0}")]
    Declined(String),

    #[error("merge engine already failed; start a new run")]
    Aborted,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` when the user chose to stop rather than something going wrong.
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined(_))
    }
}
