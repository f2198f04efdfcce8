//! Catalog plugin browsing and importing files from an SFTP server
//!
//! Folders are remote directories, resources are remote files and ids are the
//! remote paths relative to the login directory (`./data/file.csv`). Sessions
//! are kept in a [`ConnectionCache`] and reused across calls while the
//! catalog configuration and secrets stay the same.

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod handler;
pub mod paths;
pub mod remote;
pub mod session;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::{
    Capability, CatalogItem, CatalogPlugin, DownloadContext, Folder, ListContext, ListResult,
    PluginMetadata, PrepareContext, Resource, ResourceContext, Secrets,
};
use crate::config::SftpDefaults;
use crate::error::{CatalogError, Result};
use crate::validation;

pub use cache::{ConnectionCache, Fingerprint};
pub use client::SftpClient;
pub use config::{ConnectParams, ConnectionKey, Credential, PLACEHOLDER, SftpConfig};
pub use remote::{Connector, RemoteEntry, RemoteFs};

static METADATA: PluginMetadata = PluginMetadata {
    title: "Catalog SFTP",
    description: "Import files from an SFTP server",
    capabilities: &[Capability::Import],
};

pub struct SftpPlugin {
    connector: Arc<dyn Connector>,
    cache: ConnectionCache,
}

impl std::fmt::Debug for SftpPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpPlugin")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Default for SftpPlugin {
    fn default() -> Self {
        Self::new(&SftpDefaults::default())
    }
}

impl SftpPlugin {
    pub fn new(settings: &SftpDefaults) -> Self {
        Self::with_connector(Arc::new(SftpClient::new(settings)))
    }

    pub fn with_connector(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            cache: ConnectionCache::new(),
        }
    }

    /// Cached session for this configuration.
    ///
    /// Any transport failure is logged and reported as `ConnectionInvalid`.
    async fn session(
        &self,
        config: &SftpConfig,
        secrets: &Secrets,
    ) -> Result<Arc<dyn RemoteFs>> {
        let fingerprint = Fingerprint::of(config, secrets)?;

        let connector = self.connector.clone();
        let result = self
            .cache
            .get_or_connect(&fingerprint, || async move {
                let params = ConnectParams::resolve(config, secrets)?;
                connector.connect(&params).await
            })
            .await;

        result.map_err(|e| {
            tracing::warn!(
                host = %config.url.trim(),
                port = config.port,
                error = %e,
                "SFTP connection failed"
            );
            CatalogError::ConnectionInvalid
        })
    }

    /// Metadata derived from the path alone
    fn describe(config: &SftpConfig, resource_id: &str) -> Resource {
        Resource {
            id: resource_id.to_string(),
            title: paths::title_of(resource_id).to_string(),
            format: paths::format_of(resource_id).to_string(),
            origin: Some(config.origin()),
            ..Default::default()
        }
    }

    fn to_item(folder: &str, entry: RemoteEntry) -> CatalogItem {
        let id = paths::child_id(folder, &entry.name);
        if entry.is_dir {
            CatalogItem::Folder(Folder::new(id, entry.name))
        } else {
            CatalogItem::Resource(Resource {
                format: paths::format_of(&entry.name).to_string(),
                title: entry.name,
                id,
                size: entry.size,
                updated_at: entry.modified,
                ..Default::default()
            })
        }
    }
}

#[async_trait]
impl CatalogPlugin for SftpPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &METADATA
    }

    fn config_schema(&self) -> serde_json::Value {
        config::config_schema()
    }

    async fn prepare(&self, ctx: PrepareContext) -> Result<PrepareContext> {
        let config = SftpConfig::from_value(&ctx.catalog_config)?;
        let (config, secrets) = config::mask_credentials(&config, &ctx.secrets);

        // Test with a throwaway session that never enters the cache
        let params = ConnectParams::resolve(&config, &secrets)
            .map_err(CatalogError::ConnectionTestFailed)?;
        let session = self
            .connector
            .connect(&params)
            .await
            .map_err(CatalogError::ConnectionTestFailed)?;
        session.close().await;

        tracing::info!(host = %params.host, port = params.port, "SFTP connection test succeeded");
        Ok(PrepareContext {
            catalog_config: serde_json::to_value(&config)?,
            secrets,
        })
    }

    async fn list(&self, ctx: ListContext) -> Result<ListResult> {
        let config = SftpConfig::from_value(&ctx.catalog_config)?;
        let session = self.session(&config, &ctx.secrets).await?;

        let folder = ctx
            .params
            .current_folder_id
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(paths::ROOT);

        let results: Vec<CatalogItem> = session
            .list_dir(folder)
            .await?
            .into_iter()
            .filter(|entry| entry.name != "." && entry.name != "..")
            .map(|entry| Self::to_item(folder, entry))
            .collect();

        tracing::debug!(folder, count = results.len(), "Listed SFTP folder");
        Ok(ListResult::new(results, paths::breadcrumb(folder)))
    }

    async fn get_resource(&self, ctx: ResourceContext) -> Result<Resource> {
        let config = SftpConfig::from_value(&ctx.catalog_config)?;
        Ok(Self::describe(&config, &ctx.resource_id))
    }

    async fn download_resource(&self, ctx: DownloadContext) -> Result<PathBuf> {
        let config = SftpConfig::from_value(&ctx.catalog_config)?;
        validation::validate_remote_path(&ctx.resource_id)?;

        let session = self.session(&config, &ctx.secrets).await?;
        let dest = paths::local_target(&ctx.tmp_dir, &ctx.resource_id);
        let bytes = session.download(&ctx.resource_id, &dest).await?;

        tracing::info!(
            resource = %ctx.resource_id,
            bytes,
            path = %dest.display(),
            "SFTP resource downloaded"
        );
        Ok(dest)
    }
}
