use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create config directory: {0}")]
    CreateDir(std::io::Error),
}

/// SFTP transport errors
#[derive(Error, Debug)]
pub enum SftpError {
    #[error("SFTP connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid private key: {0}")]
    KeyFormat(String),

    #[error("File operation failed: {0}")]
    FileOperation(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Local I/O error: {0}")]
    LocalIo(String),

    #[error("russh error: {0}")]
    Russh(String),
}

impl From<russh::Error> for SftpError {
    fn from(err: russh::Error) -> Self {
        SftpError::Russh(err.to_string())
    }
}

/// Kind of catalog entry a lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    Resource,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Folder => f.write_str("Folder"),
            EntryKind::Resource => f.write_str("Resource"),
        }
    }
}

/// Errors returned to the catalog host by plugin operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unsupported connection method: '{0}'")]
    UnsupportedConnectionMethod(String),

    /// The transport refused the configuration. The cause is logged, not carried.
    #[error("Invalid configuration")]
    ConnectionInvalid,

    #[error("{kind} with ID {id} not found")]
    NotFound { kind: EntryKind, id: String },

    #[error("Connection test failed")]
    ConnectionTestFailed(#[source] SftpError),

    #[error(transparent)]
    Sftp(#[from] SftpError),

    #[error("Plugin does not support '{0}'")]
    UnsupportedCapability(&'static str),

    #[error("Malformed catalog configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn folder_not_found(id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind: EntryKind::Folder,
            id: id.into(),
        }
    }

    pub fn resource_not_found(id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            kind: EntryKind::Resource,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
