//! Contract between the catalog host and its plugins
//!
//! The host loads a plugin, shows its [`PluginMetadata`] and configuration
//! schema to users, then calls one [`CatalogPlugin`] operation per request.

pub mod context;
pub mod types;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

pub use context::{
    DeleteContext, DownloadContext, ListContext, ListParams, PrepareContext, PublishContext,
    ResourceContext, Secrets,
};
pub use types::{CatalogItem, Crumb, Dataset, Folder, ListResult, Publication, RemoteDataset, Resource};

/// Host operations a plugin may declare support for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Import,
    Search,
    ImportConfig,
    PublishDataset,
    DeletePublication,
}

/// Static description displayed by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMetadata {
    pub title: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [Capability],
}

impl PluginMetadata {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Operations the catalog host invokes on a plugin.
///
/// Every call is independent; implementations may be called concurrently.
#[async_trait]
pub trait CatalogPlugin: Send + Sync {
    fn metadata(&self) -> &PluginMetadata;

    /// JSON schema the host renders as the catalog settings form
    fn config_schema(&self) -> serde_json::Value;

    /// JSON schema for per-import options, if the plugin takes any
    fn import_config_schema(&self) -> Option<serde_json::Value> {
        None
    }

    /// Split submitted configuration into a displayable config and a secret store.
    async fn prepare(&self, ctx: PrepareContext) -> Result<PrepareContext> {
        Ok(ctx)
    }

    async fn list(&self, ctx: ListContext) -> Result<ListResult>;

    /// Metadata only; never fetches content.
    async fn get_resource(&self, ctx: ResourceContext) -> Result<Resource>;

    /// Fetch the resource into `ctx.tmp_dir` and return the local file path.
    async fn download_resource(&self, ctx: DownloadContext) -> Result<PathBuf>;

    /// Download, then return the resource metadata with `file_path` set.
    async fn fetch_resource(&self, ctx: DownloadContext) -> Result<Resource> {
        let lookup = ResourceContext {
            catalog_config: ctx.catalog_config.clone(),
            secrets: ctx.secrets.clone(),
            resource_id: ctx.resource_id.clone(),
        };
        let file_path = self.download_resource(ctx).await?;
        let mut resource = self.get_resource(lookup).await?;
        resource.file_path = Some(file_path);
        Ok(resource)
    }

    async fn publish_dataset(&self, _ctx: PublishContext) -> Result<Publication> {
        Err(CatalogError::UnsupportedCapability("publishDataset"))
    }

    async fn delete_dataset(&self, _ctx: DeleteContext) -> Result<()> {
        Err(CatalogError::UnsupportedCapability("deletePublication"))
    }
}
