use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Merge(#[from] hexm::Error),
}

impl CliError {
    pub fn is_declined(&self) -> bool {
        matches!(self, CliError::Merge(e) if e.is_declined())
    }
}
