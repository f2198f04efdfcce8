//! Per-call inputs handed over by the catalog host

use std::collections::BTreeMap;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::types::{Dataset, Publication};

/// Credential-only side of a split catalog configuration.
///
/// Ordered so that two stores with the same entries serialize identically.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secrets(BTreeMap<String, String>);

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "[REDACTED]")))
            .finish()
    }
}

impl Secrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Secret value wrapped for the transport
    pub fn secret(&self, field: &str) -> Option<SecretString> {
        self.0.get(field).map(|v| SecretString::from(v.clone()))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> bool {
        self.0.remove(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Secrets {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareContext {
    #[serde(default)]
    pub catalog_config: serde_json::Value,
    #[serde(default)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_folder_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContext {
    #[serde(default)]
    pub catalog_config: serde_json::Value,
    #[serde(default)]
    pub secrets: Secrets,
    #[serde(default)]
    pub params: ListParams,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContext {
    #[serde(default)]
    pub catalog_config: serde_json::Value,
    #[serde(default)]
    pub secrets: Secrets,
    pub resource_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadContext {
    #[serde(default)]
    pub catalog_config: serde_json::Value,
    #[serde(default)]
    pub secrets: Secrets,
    pub resource_id: String,
    #[serde(default)]
    pub import_config: serde_json::Value,
    pub tmp_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishContext {
    #[serde(default)]
    pub catalog_config: serde_json::Value,
    #[serde(default)]
    pub secrets: Secrets,
    pub dataset: Dataset,
    #[serde(default)]
    pub publication: Publication,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContext {
    #[serde(default)]
    pub catalog_config: serde_json::Value,
    #[serde(default)]
    pub secrets: Secrets,
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}
