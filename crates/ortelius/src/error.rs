use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrteliusError {
    #[error("Search error: {0}")]
    Search(#[from] crate::search::SearchError),
    #[error("Index error: {0}")]
    Index(#[from] crate::index::IndexError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Init Logging error: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, OrteliusError>;
