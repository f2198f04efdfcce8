//! Shared SFTP sessions keyed by configuration
//!
//! Each distinct configuration plus secrets gets its own slot, so catalogs that
//! point at the same account with different settings never disturb each
//! other's sessions. A slot's session is reused while it stays open.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use data_encoding::HEXLOWER;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::catalog::Secrets;
use crate::error::SftpError;

use super::config::SftpConfig;
use super::remote::RemoteFs;

/// Digest of the exact configuration and secrets a session was opened with
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Derived from secrets, keep it out of logs
        f.write_str("Fingerprint(..)")
    }
}

impl Fingerprint {
    pub fn of(config: &SftpConfig, secrets: &Secrets) -> Result<Self, serde_json::Error> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(config)?);
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(secrets)?);
        Ok(Self(HEXLOWER.encode(&hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

type Slot = Arc<tokio::sync::Mutex<Option<Arc<dyn RemoteFs>>>>;

#[derive(Default)]
pub struct ConnectionCache {
    slots: Mutex<HashMap<Fingerprint, Slot>>,
}

impl std::fmt::Debug for ConnectionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionCache")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

impl ConnectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, fingerprint: &Fingerprint) -> Slot {
        self.slots
            .lock()
            .entry(fingerprint.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(None)))
            .clone()
    }

    /// Return the open session cached for `fingerprint`, otherwise open a new
    /// one with `connect`.
    ///
    /// Concurrent callers with the same fingerprint wait on the slot, so only
    /// one of them connects. A session that went away is dropped from the
    /// slot, never closed here: callers may still hold it.
    pub async fn get_or_connect<F, Fut>(
        &self,
        fingerprint: &Fingerprint,
        connect: F,
    ) -> Result<Arc<dyn RemoteFs>, SftpError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn RemoteFs>, SftpError>>,
    {
        let slot = self.slot(fingerprint);
        let mut guard = slot.lock().await;

        if let Some(session) = guard.as_ref() {
            if !session.is_closed() {
                tracing::debug!("Reusing SFTP session");
                return Ok(session.clone());
            }
            tracing::debug!("Cached SFTP session was closed, reconnecting");
        }
        *guard = None;

        match connect().await {
            Ok(session) => {
                *guard = Some(session.clone());
                Ok(session)
            }
            Err(e) => {
                drop(guard);
                self.invalidate_if_matches(fingerprint, &slot);
                Err(e)
            }
        }
    }

    fn invalidate_if_matches(&self, fingerprint: &Fingerprint, slot: &Slot) {
        let mut slots = self.slots.lock();
        if let Some(existing) = slots.get(fingerprint) {
            if Arc::ptr_eq(existing, slot) {
                slots.remove(fingerprint);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}
