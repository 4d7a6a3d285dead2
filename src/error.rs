use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Logger already installed")]
    Logger(#[from] log::SetLoggerError),
    #[error("Asset {0} not found")]
    AssetNotFound(String),
    #[error("Unknown enemy kind {0:?}")]
    UnknownEnemyKind(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
