use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Template bank error: {0}")]
    Bank(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),
}

impl From<serde_json::Error> for RoastError {
    fn from(e: serde_json::Error) -> Self {
        RoastError::Serialize(e.to_string())
    }
}

impl From<serde_yaml::Error> for RoastError {
    fn from(e: serde_yaml::Error) -> Self {
        RoastError::Bank(e.to_string())
    }
}
