//! Live SFTP session over an authenticated SSH connection

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use russh::Disconnect;
use russh::client::Handle;
use russh_sftp::client::SftpSession as RusshSftpSession;
use tokio::fs::OpenOptions;
use tokio::io;
use tokio::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::error::SftpError;
use crate::security_log;

use super::handler::ClientHandler;
use super::remote::{RemoteEntry, RemoteFs};

pub struct SftpSession {
    sftp: Mutex<RusshSftpSession>,
    handle: Arc<Mutex<Handle<ClientHandler>>>,
    host: String,
    port: u16,
    closed: AtomicBool,
}

impl std::fmt::Debug for SftpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpSession")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SftpSession {
    pub fn new(
        sftp: RusshSftpSession,
        handle: Handle<ClientHandler>,
        host: String,
        port: u16,
    ) -> Self {
        Self {
            sftp: Mutex::new(sftp),
            handle: Arc::new(Mutex::new(handle)),
            host,
            port,
            closed: AtomicBool::new(false),
        }
    }
}

/// Create `path` and its missing parents, owner read/write only
async fn create_local_file(path: &Path) -> Result<tokio::fs::File, SftpError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            SftpError::LocalIo(format!(
                "Failed to create local directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        options.mode(0o600);
    }
    options.open(path).await.map_err(|e| {
        SftpError::LocalIo(format!(
            "Failed to write local file {}: {}",
            path.display(),
            e
        ))
    })
}

#[async_trait]
impl RemoteFs for SftpSession {
    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>, SftpError> {
        let sftp = self.sftp.lock().await;

        let read_dir = sftp.read_dir(path.to_string()).await.map_err(|e| {
            SftpError::FileOperation(format!("Failed to read directory {}: {}", path, e))
        })?;

        Ok(read_dir
            .map(|entry| {
                let metadata = entry.metadata();
                RemoteEntry {
                    name: entry.file_name(),
                    is_dir: metadata.is_dir(),
                    size: metadata.size,
                    modified: metadata
                        .mtime
                        .and_then(|mtime| Utc.timestamp_opt(mtime as i64, 0).single()),
                }
            })
            .collect())
    }

    async fn download(&self, remote_path: &str, local_path: &Path) -> Result<u64, SftpError> {
        let sftp = self.sftp.lock().await;

        let mut remote = sftp.open(remote_path.to_string()).await.map_err(|e| {
            SftpError::Transfer(format!("Failed to open remote file {}: {}", remote_path, e))
        })?;

        // Only touch the local tree once the remote file is known to exist
        let mut local = create_local_file(local_path).await?;

        let bytes = io::copy(&mut remote, &mut local).await.map_err(|e| {
            SftpError::Transfer(format!(
                "Failed to download {} to {}: {}",
                remote_path,
                local_path.display(),
                e
            ))
        })?;

        tracing::debug!(remote = %remote_path, bytes, "Downloaded remote file");
        Ok(bytes)
    }

    fn is_closed(&self) -> bool {
        if self.closed.load(Ordering::SeqCst) {
            return true;
        }
        // A busy handle is in use, hence still open
        self.handle
            .try_lock()
            .map(|handle| handle.is_closed())
            .unwrap_or(false)
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        // Wait for any transfer in flight before tearing down the channel
        let _sftp = self.sftp.lock().await;
        let handle = self.handle.lock().await;
        let _ = handle
            .disconnect(Disconnect::ByApplication, "session closed", "en")
            .await;
        security_log::log_sftp_disconnect(&self.host, self.port);
    }
}

impl Drop for SftpSession {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        security_log::log_sftp_disconnect(&self.host, self.port);
        let handle = self.handle.clone();
        let host = self.host.clone();
        let port = self.port;
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    let handle_guard = handle.lock().await;
                    let _ = handle_guard
                        .disconnect(Disconnect::ByApplication, "connection dropped", "en")
                        .await;
                    tracing::debug!("SFTP connection cleanup: disconnected {}:{}", host, port);
                });
            }
            Err(_) => {
                tracing::debug!(
                    "SFTP connection dropped without a Tokio runtime; disconnect skipped"
                );
            }
        }
    }
}
