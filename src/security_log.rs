//! Security event logging for audit trails.
//!
//! Provides structured logging functions for security-relevant events such as
//! authentication attempts, connection establishment, host keys and credential
//! masking.
//!
//! All security events are logged with `target: "security"` to allow filtering
//! in production environments.
//!
//! # Example
//!
//! Filter security events only:
//! ```bash
//! RUST_LOG=security=info catalog-plugins sftp
//! ```

use tracing::{info, warn};

/// Log an SSH authentication attempt.
///
/// Called before attempting to authenticate with a remote host.
pub fn log_auth_attempt(host: &str, port: u16, username: &str, method: &str) {
    info!(
        target: "security",
        event = "auth_attempt",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        "SSH authentication attempt"
    );
}

/// Log a successful SSH authentication.
pub fn log_auth_success(host: &str, port: u16, username: &str, method: &str) {
    info!(
        target: "security",
        event = "auth_success",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        "SSH authentication succeeded"
    );
}

/// Log a failed SSH authentication attempt.
pub fn log_auth_failure(host: &str, port: u16, username: &str, method: &str, reason: &str) {
    warn!(
        target: "security",
        event = "auth_failure",
        host = %host,
        port = port,
        username = %username,
        method = %method,
        reason = %reason,
        "SSH authentication failed"
    );
}

/// Log an SFTP connection establishment.
pub fn log_sftp_connect(host: &str, port: u16, username: &str) {
    info!(
        target: "security",
        event = "sftp_connect",
        host = %host,
        port = port,
        username = %username,
        "SFTP connection established"
    );
}

/// Log an SFTP connection teardown.
pub fn log_sftp_disconnect(host: &str, port: u16) {
    info!(
        target: "security",
        event = "sftp_disconnect",
        host = %host,
        port = port,
        "SFTP connection closed"
    );
}

/// Log a server host key accepted without a known_hosts entry.
///
/// Catalog connections run unattended, so there is nobody to confirm the key;
/// the fingerprint is recorded for later audit instead.
pub fn log_host_key_unverified(host: &str, port: u16, fingerprint: &str, key_type: &str) {
    warn!(
        target: "security",
        event = "host_key_unverified",
        host = %host,
        port = port,
        fingerprint = %fingerprint,
        key_type = %key_type,
        "Accepted host key without verification"
    );
}

/// Log a credential moved from the catalog config into the secret store.
///
/// Only the field name is recorded, never the value.
pub fn log_credential_masked(field: &str) {
    info!(
        target: "security",
        event = "credential_masked",
        field = %field,
        "Credential moved to secret store"
    );
}

/// Log a credential removed from the secret store.
pub fn log_credential_cleared(field: &str) {
    info!(
        target: "security",
        event = "credential_cleared",
        field = %field,
        "Credential removed from secret store"
    );
}
