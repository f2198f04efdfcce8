//! Shapes exchanged with the catalog host

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grouping node in the resource hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub title: String,
}

impl Folder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A single downloadable data file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Trailing file extension, empty when the name has none
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set only once the content has been downloaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

/// Entry of a folder listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogItem {
    Folder(Folder),
    Resource(Resource),
}

impl CatalogItem {
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Folder(folder) => &folder.id,
            CatalogItem::Resource(resource) => &resource.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CatalogItem::Folder(folder) => &folder.title,
            CatalogItem::Resource(resource) => &resource.title,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, CatalogItem::Folder(_))
    }
}

/// Serialized breadcrumbs carry the same `type` tag as listing entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "folder")]
pub struct Crumb {
    pub id: String,
    pub title: String,
}

impl From<Folder> for Crumb {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            title: folder.title,
        }
    }
}

/// Result of a `list` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    pub count: usize,
    pub results: Vec<CatalogItem>,
    /// Ancestors of the listed folder, root first, listed folder last
    pub path: Vec<Crumb>,
}

impl ListResult {
    pub fn new(results: Vec<CatalogItem>, path: Vec<Folder>) -> Self {
        Self {
            count: results.len(),
            results,
            path: path.into_iter().map(Crumb::from).collect(),
        }
    }

    pub fn path_ids(&self) -> Vec<&str> {
        self.path.iter().map(|c| c.id.as_str()).collect()
    }
}

/// Dataset being published, as described by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Identifier of a dataset on the remote catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDataset {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Publication record owned by the host; unknown fields are carried through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(default)]
    pub is_resource: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_dataset: Option<RemoteDataset>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
