use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnumerizeError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Declaration error: {0}")]
    Declaration(String),
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("Attribute '{0}' does not hold multiple values")]
    NotMultiple(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, EnumerizeError>;

// Helper conversions
impl From<rusqlite::Error> for EnumerizeError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}
impl From<config::ConfigError> for EnumerizeError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for EnumerizeError {
    fn from(e: serde_json::Error) -> Self { Self::Serialization(e.to_string()) }
}
