use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file I/O failed")]
    FileError(#[from] std::io::Error),
    #[error("could not parse export rows")]
    CsvError(#[from] csv::Error),
    #[error("could not parse column configuration")]
    ConfigError(#[from] toml::de::Error),
    #[error("could not serialize chart")]
    ChartError(#[from] serde_json::Error),
    #[error(transparent)]
    BusinessError(#[from] crate::domain::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
