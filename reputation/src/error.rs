use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("validator already registered: {0}")]
    AlreadyRegistered(String),

    #[error("unknown validator: {0}")]
    UnknownValidator(String),
}
