//! Docker-based SFTP test fixtures

use std::path::PathBuf;
use std::process::Command;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

// Ensure Docker containers are started only once per test run
static DOCKER_INIT: Once = Once::new();
static DOCKER_AVAILABLE: AtomicBool = AtomicBool::new(false);

/// Configuration for the test SFTP server
#[derive(Debug, Clone)]
pub struct TestSftpServer {
    pub host: String,
    pub port: u16,
    pub login: String,
    pub password: String,
    pub private_key_path: PathBuf,
}

impl Default for TestSftpServer {
    fn default() -> Self {
        let test_keys_dir =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/docker/test_keys");
        Self {
            host: "127.0.0.1".to_string(),
            port: 2222,
            login: "testuser".to_string(),
            password: "testpass123".to_string(),
            private_key_path: test_keys_dir.join("id_ed25519"),
        }
    }
}

/// Start Docker containers for SFTP testing
pub fn ensure_docker_started() {
    DOCKER_INIT.call_once(|| {
        let docker_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/docker");

        if Command::new("docker").arg("--version").output().is_err() {
            eprintln!("WARNING: Docker not available, SFTP integration tests will be skipped");
            return;
        }

        let status = if Command::new("docker-compose")
            .arg("--version")
            .output()
            .is_ok()
        {
            Command::new("docker-compose")
                .current_dir(&docker_dir)
                .args(["up", "-d", "--wait"])
                .status()
        } else {
            Command::new("docker")
                .current_dir(&docker_dir)
                .args(["compose", "up", "-d", "--wait"])
                .status()
        };

        match status {
            Ok(s) if s.success() => {
                DOCKER_AVAILABLE.store(true, Ordering::SeqCst);
                eprintln!("SFTP test containers started successfully");
            }
            Ok(s) => {
                eprintln!(
                    "Failed to start SFTP test containers: exit code {:?}",
                    s.code()
                );
            }
            Err(e) => {
                eprintln!("Failed to start SFTP test containers: {}", e);
            }
        }
    });
}

/// Check if Docker containers are running
pub fn is_docker_available() -> bool {
    ensure_docker_started();
    DOCKER_AVAILABLE.load(Ordering::SeqCst)
}

/// Wait for the SFTP server to accept TCP connections
pub async fn wait_for_sftp_ready(host: &str, port: u16) -> Result<(), String> {
    let addr = format!("{}:{}", host, port);
    let max_attempts = 30;

    for attempt in 1..=max_attempts {
        match timeout(Duration::from_secs(2), TcpStream::connect(&addr)).await {
            Ok(Ok(_)) => return Ok(()),
            _ if attempt == max_attempts => {
                return Err(format!(
                    "SFTP server not ready after {} attempts",
                    max_attempts
                ));
            }
            _ => sleep(Duration::from_millis(200)).await,
        }
    }

    Err("SFTP server not ready".to_string())
}

/// Test environment with a running server and a scratch download directory
pub struct SftpTestEnvironment {
    pub server: TestSftpServer,
    pub tmp_dir: TempDir,
}

impl SftpTestEnvironment {
    pub async fn new() -> Result<Self, String> {
        if !is_docker_available() {
            return Err("Docker not available".to_string());
        }

        let server = TestSftpServer::default();
        wait_for_sftp_ready(&server.host, server.port).await?;

        let tmp_dir = TempDir::new().map_err(|e| format!("Failed to create temp dir: {}", e))?;
        Ok(Self { server, tmp_dir })
    }

    /// Catalog config as a user would submit it, secret inline
    pub fn password_config(&self, password: &str) -> Value {
        json!({
            "url": self.server.host,
            "port": self.server.port,
            "login": self.server.login,
            "connectionKey": { "key": "password", "password": password }
        })
    }

    pub fn ssh_key_config(&self, key: &str) -> Value {
        json!({
            "url": self.server.host,
            "port": self.server.port,
            "login": self.server.login,
            "connectionKey": { "key": "sshKey", "sshKey": key }
        })
    }

    pub fn private_key(&self) -> Option<String> {
        std::fs::read_to_string(&self.server.private_key_path).ok()
    }
}

/// Macro to skip tests when Docker is not available
#[macro_export]
macro_rules! skip_if_no_docker {
    () => {
        if !super::fixtures::is_docker_available() {
            eprintln!("Skipping test: Docker not available");
            return;
        }
    };
}
