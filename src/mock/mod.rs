//! Demo plugin serving a hardcoded folder/resource tree

pub mod tree;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{
    Capability, CatalogPlugin, DeleteContext, DownloadContext, ListContext, ListResult,
    PluginMetadata, Publication, PublishContext, RemoteDataset, Resource, ResourceContext,
};
use crate::config::MockDefaults;
use crate::error::{CatalogError, Result};
use crate::validation::{self, ValidationError};

use tree::{ResourceTree, TREE};

/// Largest `nbRows` an import may request
pub const MAX_ROWS: u32 = 50;

/// File name of the simulated download
pub const SAMPLE_FILE_NAME: &str = "jdd-mock.csv";

static SAMPLE_CSV: &str = include_str!("../../assets/jdd-mock.csv");

static METADATA: PluginMetadata = PluginMetadata {
    title: "Catalog Mock",
    description: "Mock plugin for Data Fair Catalog",
    capabilities: &[
        Capability::Import,
        Capability::Search,
        Capability::ImportConfig,
        Capability::PublishDataset,
        Capability::DeletePublication,
    ],
};

fn default_rows() -> u32 {
    10
}

/// Per-import options accepted by the mock
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfig {
    #[serde(default = "default_rows")]
    pub nb_rows: u32,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            nb_rows: default_rows(),
        }
    }
}

impl ImportConfig {
    /// Decode and validate the host's import options
    pub fn from_value(value: &serde_json::Value) -> std::result::Result<Self, ValidationError> {
        let config = if value.is_null() {
            Self::default()
        } else {
            Self::deserialize(value)
                .map_err(|e| ValidationError::new("importConfig", e.to_string()))?
        };
        validation::validate_row_count(config.nb_rows, MAX_ROWS)?;
        Ok(config)
    }
}

/// Keep up to `nb_rows` lines after the header of `source`.
fn truncate_rows(source: &str, nb_rows: usize) -> String {
    let mut out = String::new();
    for line in source.lines().skip(1).take(nb_rows) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[derive(Debug)]
pub struct MockPlugin {
    tree: &'static ResourceTree,
    latency: Duration,
}

impl Default for MockPlugin {
    fn default() -> Self {
        Self::new(&MockDefaults::default())
    }
}

impl MockPlugin {
    pub fn new(settings: &MockDefaults) -> Self {
        Self::with_latency(settings.latency())
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            tree: &TREE,
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl CatalogPlugin for MockPlugin {
    fn metadata(&self) -> &PluginMetadata {
        &METADATA
    }

    fn config_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "title": "Configuration du catalogue mock",
            "properties": {
                "url": {
                    "type": "string",
                    "title": "URL du catalogue",
                    "default": "http://localhost:3000"
                }
            }
        })
    }

    fn import_config_schema(&self) -> Option<serde_json::Value> {
        Some(json!({
            "type": "object",
            "title": "Configuration de l'import",
            "properties": {
                "nbRows": {
                    "type": "integer",
                    "title": "Nombre de lignes",
                    "minimum": 1,
                    "maximum": MAX_ROWS,
                    "default": default_rows()
                }
            }
        }))
    }

    async fn list(&self, ctx: ListContext) -> Result<ListResult> {
        self.simulate_latency().await;

        let folder_id = ctx
            .params
            .current_folder_id
            .as_deref()
            .filter(|f| !f.is_empty());
        let path = match folder_id {
            Some(id) => self.tree.breadcrumb(id)?,
            None => Vec::new(),
        };
        let results = self.tree.children(folder_id);

        tracing::debug!(
            folder = folder_id.unwrap_or("<root>"),
            count = results.len(),
            "Listed mock folder"
        );
        Ok(ListResult::new(results, path))
    }

    async fn get_resource(&self, ctx: ResourceContext) -> Result<Resource> {
        self.simulate_latency().await;
        self.tree.get_resource(&ctx.resource_id)
    }

    async fn download_resource(&self, ctx: DownloadContext) -> Result<PathBuf> {
        self.simulate_latency().await;

        let import_config = ImportConfig::from_value(&ctx.import_config)?;
        // Existence check only; every resource serves the same sample
        self.tree.get_resource(&ctx.resource_id)?;

        tokio::fs::create_dir_all(&ctx.tmp_dir)
            .await
            .map_err(|e| CatalogError::Io {
                path: ctx.tmp_dir.clone(),
                source: e,
            })?;

        let dest = ctx.tmp_dir.join(SAMPLE_FILE_NAME);
        let content = truncate_rows(SAMPLE_CSV, import_config.nb_rows as usize);
        tokio::fs::write(&dest, content)
            .await
            .map_err(|e| CatalogError::Io {
                path: dest.clone(),
                source: e,
            })?;

        tracing::info!(
            resource = %ctx.resource_id,
            rows = import_config.nb_rows,
            path = %dest.display(),
            "Mock resource downloaded"
        );
        Ok(dest)
    }

    async fn publish_dataset(&self, ctx: PublishContext) -> Result<Publication> {
        tracing::info!(dataset = %ctx.dataset.id, "Publishing dataset");

        let mut publication = ctx.publication;
        publication.remote_dataset = Some(RemoteDataset {
            id: format!("my-mock-{}", ctx.dataset.id),
            title: ctx.dataset.title,
            url: format!("https://example.com/dataset/{}", ctx.dataset.id),
        });
        Ok(publication)
    }

    async fn delete_dataset(&self, ctx: DeleteContext) -> Result<()> {
        tracing::info!(dataset = %ctx.dataset_id, "Deleting dataset");
        Ok(())
    }
}
