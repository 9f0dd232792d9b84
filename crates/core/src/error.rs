use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum RibbonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("media session error: {0}")]
    Media(String),

    #[error("artwork error: {0}")]
    Artwork(String),

    #[error("widget error: {0}")]
    Widget(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = RibbonError> = std::result::Result<T, E>;
