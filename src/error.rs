use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The server returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("The server responded with status code {0}")]
    HttpStatus(u16),

    #[error("Unable to decode the response: {0}")]
    Decoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    /// Network-path errors are recoverable by retrying the request.
    pub fn is_temporary(&self) -> bool {
        matches!(
            self,
            Error::InvalidResponse(_) | Error::HttpStatus(_) | Error::Io(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidResponse(_) => "INVALID_RESPONSE",
            Error::HttpStatus(_) => "HTTP_STATUS",
            Error::Decoding(_) => "DECODING",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION",
            Error::Config(_) => "CONFIG",
            Error::Storage(_) => "STORAGE",
        }
    }
}
