use thiserror::Error;

#[derive(Error, Debug)]
pub enum SukiyakiError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Database error: {0}")]
    Database(Box<sqlx::Error>),

    #[error("Vibrato error: {0}")]
    Vibrato(Box<vibrato::errors::VibratoError>),

    #[error("Failed to load file: {0}")]
    FailedToLoadFile(String),

    #[error("SukiyakiError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for SukiyakiError {
    fn from(error: std::io::Error) -> Self {
        SukiyakiError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for SukiyakiError {
    fn from(error: reqwest::Error) -> Self {
        SukiyakiError::Reqwest(Box::new(error))
    }
}

impl From<sqlx::Error> for SukiyakiError {
    fn from(error: sqlx::Error) -> Self {
        SukiyakiError::Database(Box::new(error))
    }
}

impl From<vibrato::errors::VibratoError> for SukiyakiError {
    fn from(error: vibrato::errors::VibratoError) -> Self {
        SukiyakiError::Vibrato(Box::new(error))
    }
}
