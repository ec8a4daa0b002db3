use thiserror::Error;

use crate::domain::menu_item::MenuItemId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input for `{field}`: {message}")]
    InvalidInput { field: &'static str, message: String },
    #[error("menu item {0} is not in the catalog")]
    UnknownItem(MenuItemId),
    #[error("no menu item id is left after {0}")]
    IdExhausted(MenuItemId),
}

impl DomainError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput { field, message: message.into() }
    }
}

/// Failures raised by a [`CatalogStorage`](crate::catalog::storage::CatalogStorage) backend.
///
/// The store recovers from every variant and turns it into a notice; callers only see these
/// when they talk to a backend directly.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("catalog resource `{resource}` does not exist")]
    Missing { resource: String },
    #[error("catalog resource `{resource}` is not a valid catalog: {source}")]
    Malformed {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode catalog for `{resource}`: {source}")]
    Encode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("i/o failure on catalog resource `{resource}`: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<StorageError> for ApplicationError {
    fn from(value: StorageError) -> Self {
        Self::Persistence(value.to_string())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("storage unavailable: {message}")]
    StorageUnavailable { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::StorageUnavailable { .. } => {
                "The catalog file could not be written. Changes are kept in memory only."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "invalid_input",
            Self::StorageUnavailable { .. } => "persistence",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::BadRequest { message: error.to_string() },
            ApplicationError::Persistence(message) => Self::StorageUnavailable { message },
            ApplicationError::Configuration(message) => Self::Internal { message },
        }
    }
}
