use thiserror::Error;

#[derive(Debug, Error)]
pub enum DifError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Graph store error: {0}")]
    Graph(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("No resolved results: {0}")]
    NoResults(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DifError>;
