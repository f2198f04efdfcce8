//! Input validation for user-provided configuration values.
//!
//! Provides validation functions for hosts, ports, logins, remote paths and
//! import options before they reach the transport or the filesystem.

use regex::Regex;
use std::sync::LazyLock;

/// Validation error with field context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// A single token: no whitespace, no control characters
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s\p{Cc}]+$").unwrap());

/// Validate the host a catalog connects to.
///
/// Anything the resolver might accept is allowed, including IP addresses and
/// container service names such as `sftp_server`. Only empty values, values
/// with whitespace or control characters, and overlong names are rejected.
///
/// # Errors
///
/// Returns `ValidationError` if the host is empty, too long, or not a single token.
pub fn validate_hostname(hostname: &str) -> Result<(), ValidationError> {
    let hostname = hostname.trim();

    if hostname.is_empty() {
        return Err(ValidationError::new("url", "Hostname is required"));
    }

    // DNS max is 253 characters
    if hostname.len() > 253 {
        return Err(ValidationError::new(
            "url",
            "Hostname exceeds maximum length of 253 characters",
        ));
    }

    if !TOKEN_REGEX.is_match(hostname) {
        return Err(ValidationError::new(
            "url",
            "Hostname must not contain whitespace or control characters",
        ));
    }

    Ok(())
}

/// Validate a port number.
///
/// # Errors
///
/// Returns `ValidationError` if the port is 0.
pub fn validate_port(port: u16) -> Result<u16, ValidationError> {
    if port == 0 {
        return Err(ValidationError::new("port", "Port must be between 1 and 65535"));
    }
    Ok(port)
}

/// Validate the login used for SSH connections.
///
/// There is no local user to fall back to, so the login is required. Its
/// format is left to the server (`john.doe`, `user@example.com`).
///
/// # Errors
///
/// Returns `ValidationError` if the login is empty or contains whitespace or
/// control characters.
pub fn validate_login(login: &str) -> Result<(), ValidationError> {
    let login = login.trim();

    if login.is_empty() {
        return Err(ValidationError::new("login", "Login is required"));
    }

    if !TOKEN_REGEX.is_match(login) {
        return Err(ValidationError::new(
            "login",
            "Login must not contain whitespace or control characters",
        ));
    }

    Ok(())
}

/// Validate a remote resource path before it is mapped under a local directory.
///
/// The path must be relative and must not climb out of its root with `..`.
///
/// # Errors
///
/// Returns `ValidationError` if the path is empty, absolute, or contains `..`.
pub fn validate_remote_path(path: &str) -> Result<(), ValidationError> {
    let trimmed = path.trim_start_matches("./");

    if trimmed.is_empty() || trimmed == "." {
        return Err(ValidationError::new("resourceId", "Resource path is empty"));
    }

    if trimmed.starts_with('/') {
        return Err(ValidationError::new(
            "resourceId",
            format!("Resource path '{}' must be relative", path),
        ));
    }

    if trimmed.split('/').any(|segment| segment == "..") {
        return Err(ValidationError::new(
            "resourceId",
            format!("Resource path '{}' must not contain '..'", path),
        ));
    }

    Ok(())
}

/// Validate the number of rows requested by an import.
///
/// # Errors
///
/// Returns `ValidationError` if `nb_rows` is 0 or above `max`.
pub fn validate_row_count(nb_rows: u32, max: u32) -> Result<u32, ValidationError> {
    if nb_rows == 0 {
        return Err(ValidationError::new("nbRows", "must be >= 1"));
    }
    if nb_rows > max {
        return Err(ValidationError::new(
            "nbRows",
            format!("must be <= {} (got {})", max, nb_rows),
        ));
    }
    Ok(nb_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Hostname validation tests ----

    #[test]
    fn hostname_valid_ipv4() {
        assert!(validate_hostname("192.168.1.1").is_ok());
        assert!(validate_hostname("10.0.0.1").is_ok());
        assert!(validate_hostname("127.0.0.1").is_ok());
        assert!(validate_hostname("255.255.255.255").is_ok());
    }

    #[test]
    fn hostname_valid_ipv6() {
        assert!(validate_hostname("::1").is_ok());
        assert!(validate_hostname("2001:db8::1").is_ok());
        assert!(validate_hostname("fe80::1").is_ok());
        assert!(validate_hostname("::ffff:192.168.1.1").is_ok());
    }

    #[test]
    fn hostname_valid_dns() {
        assert!(validate_hostname("example.com").is_ok());
        assert!(validate_hostname("sub.example.com").is_ok());
        assert!(validate_hostname("my-host").is_ok());
        assert!(validate_hostname("server1").is_ok());
        assert!(validate_hostname("a").is_ok());
        assert!(validate_hostname("a1").is_ok());
        assert!(validate_hostname("test-server-01.internal.example.com").is_ok());
    }

    #[test]
    fn hostname_invalid_empty() {
        assert!(validate_hostname("").is_err());
        assert!(validate_hostname("   ").is_err());
    }

    #[test]
    fn hostname_valid_service_names() {
        assert!(validate_hostname("sftp_server").is_ok());
        assert!(validate_hostname("  padded.example.com  ").is_ok());
    }

    #[test]
    fn hostname_invalid_characters() {
        assert!(validate_hostname("invalid host").is_err());
        assert!(validate_hostname("host\tname").is_err());
        assert!(validate_hostname("host\u{0}").is_err());
        assert!(validate_hostname(&"a".repeat(254)).is_err());
    }

    // ---- Port validation tests ----

    #[test]
    fn port_valid() {
        assert_eq!(validate_port(22).unwrap(), 22);
        assert_eq!(validate_port(1).unwrap(), 1);
        assert_eq!(validate_port(65535).unwrap(), 65535);
        assert_eq!(validate_port(31022).unwrap(), 31022);
    }

    #[test]
    fn port_invalid_zero() {
        let err = validate_port(0).unwrap_err();
        assert_eq!(err.field, "port");
    }

    // ---- Login validation tests ----

    #[test]
    fn login_valid() {
        assert!(validate_login("root").is_ok());
        assert!(validate_login("test3").is_ok());
        assert!(validate_login("john.doe").is_ok());
        assert!(validate_login("user@example.com").is_ok());
        assert!(validate_login("123user").is_ok());
        assert!(validate_login(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn login_required() {
        assert!(validate_login("").is_err());
        assert!(validate_login("   ").is_err());
    }

    #[test]
    fn login_invalid_characters() {
        let err = validate_login("user name").unwrap_err();
        assert_eq!(err.field, "login");
        assert!(validate_login("user\nname").is_err());
    }

    // ---- Remote path validation tests ----

    #[test]
    fn remote_path_valid() {
        assert!(validate_remote_path("./landing-zone/test.txt").is_ok());
        assert!(validate_remote_path("landing-zone/donnees/donnees.csv").is_ok());
        assert!(validate_remote_path("file..name.csv").is_ok());
    }

    #[test]
    fn remote_path_rejects_escape() {
        assert!(validate_remote_path("./../etc/passwd").is_err());
        assert!(validate_remote_path("a/../../b").is_err());
        assert!(validate_remote_path("/etc/passwd").is_err());
        assert!(validate_remote_path("./").is_err());
        assert!(validate_remote_path("").is_err());
    }

    // ---- Row count validation tests ----

    #[test]
    fn row_count_bounds() {
        assert_eq!(validate_row_count(1, 50).unwrap(), 1);
        assert_eq!(validate_row_count(50, 50).unwrap(), 50);
        assert!(validate_row_count(0, 50).is_err());

        let err = validate_row_count(100, 50).unwrap_err();
        assert_eq!(err.field, "nbRows");
        assert!(err.to_string().contains("<= 50"));
    }
}
