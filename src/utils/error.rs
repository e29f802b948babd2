use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Disc read error: {message}")]
    DiscRead { message: String },

    #[error("Rip error: {message}")]
    Rip { message: String },

    #[error("Metadata error: {message}")]
    Metadata { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl Error {
    pub fn tool<T: Into<String>>(message: T) -> Self {
        Self::Tool(message.into())
    }

    pub fn disc_read<T: Into<String>>(message: T) -> Self {
        Self::DiscRead {
            message: message.into(),
        }
    }

    pub fn rip<T: Into<String>>(message: T) -> Self {
        Self::Rip {
            message: message.into(),
        }
    }

    pub fn metadata<T: Into<String>>(message: T) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    pub fn parse<T: Into<String>>(message: T) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
