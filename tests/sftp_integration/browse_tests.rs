//! Listing and downloading against a live server

use catalog_plugins::catalog::{
    CatalogItem, CatalogPlugin, DownloadContext, ListContext, ListParams, PrepareContext, Secrets,
};
use catalog_plugins::error::CatalogError;
use catalog_plugins::sftp::SftpPlugin;
use serde_json::{Value, json};

use super::fixtures::SftpTestEnvironment;

async fn prepared(plugin: &SftpPlugin, env: &SftpTestEnvironment) -> (Value, Secrets) {
    let ctx = plugin
        .prepare(PrepareContext {
            catalog_config: env.password_config(&env.server.password),
            secrets: Secrets::new(),
        })
        .await
        .expect("prepare should succeed");
    (ctx.catalog_config, ctx.secrets)
}

fn list_ctx(config: &Value, secrets: &Secrets, folder: Option<&str>) -> ListContext {
    ListContext {
        catalog_config: config.clone(),
        secrets: secrets.clone(),
        params: ListParams {
            current_folder_id: folder.map(str::to_string),
        },
    }
}

#[tokio::test]
async fn test_list_root_and_subfolder() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let plugin = SftpPlugin::default();
    let (config, secrets) = prepared(&plugin, &env).await;

    let root = plugin
        .list(list_ctx(&config, &secrets, None))
        .await
        .expect("list root");
    assert!(root.path.is_empty());
    assert!(
        root.results
            .iter()
            .any(|item| item.is_folder() && item.id() == "./data")
    );
    assert!(root.results.iter().all(|item| item.title() != "." && item.title() != ".."));

    let data = plugin
        .list(list_ctx(&config, &secrets, Some("./data")))
        .await
        .expect("list data");
    assert_eq!(data.path_ids(), vec!["./data"]);

    let communes = data
        .results
        .iter()
        .find(|item| item.id() == "./data/communes.csv")
        .expect("communes.csv listed");
    match communes {
        CatalogItem::Resource(r) => {
            assert_eq!(r.format, "csv");
            assert!(r.size.unwrap_or(0) > 0);
        }
        CatalogItem::Folder(_) => panic!("communes.csv listed as folder"),
    }

    let nested = plugin
        .list(list_ctx(&config, &secrets, Some("./data/2024")))
        .await
        .expect("list nested");
    assert_eq!(nested.path_ids(), vec!["./data", "./data/2024"]);
    assert_eq!(nested.count, 1);
}

#[tokio::test]
async fn test_download_preserves_path() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let plugin = SftpPlugin::default();
    let (config, secrets) = prepared(&plugin, &env).await;

    let path = plugin
        .download_resource(DownloadContext {
            catalog_config: config,
            secrets,
            resource_id: "./data/2024/indicators.csv".to_string(),
            import_config: json!({}),
            tmp_dir: env.tmp_dir.path().to_path_buf(),
        })
        .await
        .expect("download");

    assert_eq!(
        path,
        env.tmp_dir.path().join("data").join("2024").join("indicators.csv")
    );
    let content = std::fs::read_to_string(&path).expect("downloaded file");
    assert!(content.starts_with("year,value"));
}

#[tokio::test]
async fn test_download_missing_file() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let plugin = SftpPlugin::default();
    let (config, secrets) = prepared(&plugin, &env).await;

    let result = plugin
        .download_resource(DownloadContext {
            catalog_config: config,
            secrets,
            resource_id: "./data/nowhere/missing.csv".to_string(),
            import_config: json!({}),
            tmp_dir: env.tmp_dir.path().to_path_buf(),
        })
        .await;

    assert!(matches!(result, Err(CatalogError::Sftp(_))));
    assert!(
        !env.tmp_dir.path().join("data").exists(),
        "no local directories for a file that was never opened"
    );
}

#[tokio::test]
async fn test_list_with_wrong_secret_is_invalid() {
    skip_if_no_docker!();

    let env = SftpTestEnvironment::new()
        .await
        .expect("Failed to create test environment");
    let plugin = SftpPlugin::default();

    let config = env.password_config("********");
    let secrets: Secrets = [("password", "wrongpassword")].into_iter().collect();
    let result = plugin.list(list_ctx(&config, &secrets, None)).await;

    let err = result.expect_err("wrong password must fail");
    assert_eq!(err.to_string(), "Invalid configuration");
}
