//! Seams between the catalog plugin and the SSH transport

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SftpError;

use super::config::ConnectParams;

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified: Option<DateTime<Utc>>,
}

/// An open SFTP session
#[async_trait]
pub trait RemoteFs: Send + Sync {
    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>, SftpError>;

    /// Copy `remote_path` to `local_path`, creating parent directories.
    ///
    /// Returns the number of bytes written.
    async fn download(&self, remote_path: &str, local_path: &Path) -> Result<u64, SftpError>;

    fn is_closed(&self) -> bool;

    async fn close(&self);
}

/// Opens SFTP sessions
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, params: &ConnectParams) -> Result<Arc<dyn RemoteFs>, SftpError>;
}
