use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FuzzError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid {what} range: max {max} is below min {min}")]
    InvalidRange {
        what: &'static str,
        min: usize,
        max: usize,
    },
    #[error("Config error: {0}")]
    Config(String),
    #[error("OS randomness unavailable: {0}")]
    Entropy(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Engine error: {0}")]
    Engine(String),
}
