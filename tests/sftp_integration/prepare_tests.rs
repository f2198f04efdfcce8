//! Credential preparation against a live server

use catalog_plugins::catalog::{CatalogPlugin, PrepareContext, Secrets};
use catalog_plugins::error::CatalogError;
use catalog_plugins::sftp::{PLACEHOLDER, SftpPlugin};

use super::fixtures::SftpTestEnvironment;

#[tokio::test]
async fn test_prepare_with_password() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let plugin = SftpPlugin::default();

    let prepared = plugin
        .prepare(PrepareContext {
            catalog_config: env.password_config(&env.server.password),
            secrets: Secrets::new(),
        })
        .await
        .expect("prepare should succeed");

    assert_eq!(
        prepared.catalog_config["connectionKey"]["password"],
        PLACEHOLDER
    );
    assert_eq!(
        prepared.secrets.get("password"),
        Some(env.server.password.as_str())
    );
}

#[tokio::test]
async fn test_prepare_with_ssh_key() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let Some(key) = env.private_key() else {
        eprintln!("Skipping test: test key not found");
        return;
    };
    let plugin = SftpPlugin::default();

    let prepared = plugin
        .prepare(PrepareContext {
            catalog_config: env.ssh_key_config(&key),
            secrets: [("password", "stale")].into_iter().collect(),
        })
        .await
        .expect("prepare should succeed");

    assert_eq!(prepared.catalog_config["connectionKey"]["sshKey"], PLACEHOLDER);
    assert!(prepared.secrets.contains("sshKey"));
    assert!(!prepared.secrets.contains("password"));
}

#[tokio::test]
async fn test_prepare_wrong_password() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let plugin = SftpPlugin::default();

    let result = plugin
        .prepare(PrepareContext {
            catalog_config: env.password_config("wrongpassword"),
            secrets: Secrets::new(),
        })
        .await;

    assert!(
        matches!(result, Err(CatalogError::ConnectionTestFailed(_))),
        "Should be ConnectionTestFailed error"
    );
}

#[tokio::test]
async fn test_prepare_placeholder_keeps_stored_secret() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let plugin = SftpPlugin::default();

    let stored: Secrets = [("password", env.server.password.as_str())]
        .into_iter()
        .collect();
    let prepared = plugin
        .prepare(PrepareContext {
            catalog_config: env.password_config(PLACEHOLDER),
            secrets: stored.clone(),
        })
        .await
        .expect("prepare should succeed");

    assert_eq!(prepared.secrets, stored);
}
