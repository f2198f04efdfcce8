//! Line-oriented JSON bridge between a catalog host process and one plugin
//!
//! Each request is a JSON object naming the operation in `op`, with the
//! operation's context fields alongside it:
//!
//! ```json
//! {"op": "list", "catalogConfig": {...}, "secrets": {...}, "params": {"currentFolderId": "./data"}}
//! ```
//!
//! Each response is `{"ok": <result>}` or `{"error": "<message>"}`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::catalog::CatalogPlugin;
use crate::config::PluginSettings;
use crate::error::CatalogError;
use crate::mock::MockPlugin;
use crate::sftp::SftpPlugin;

/// Names accepted on the command line
pub const PLUGIN_NAMES: &[&str] = &["mock", "sftp"];

/// Build the plugin registered under `name`.
pub fn plugin_by_name(name: &str, settings: &PluginSettings) -> Option<Box<dyn CatalogPlugin>> {
    match name {
        "mock" => Some(Box::new(MockPlugin::new(&settings.mock))),
        "sftp" => Some(Box::new(SftpPlugin::new(&settings.sftp))),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Request has no 'op' field")]
    MissingOp,

    #[error("Unknown operation '{0}'")]
    UnknownOp(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Message including every cause, outermost first
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn context<T: DeserializeOwned>(request: Value) -> Result<T, RequestError> {
    Ok(serde_json::from_value(request)?)
}

fn ok<T: Serialize>(value: T) -> Result<Value, RequestError> {
    Ok(serde_json::to_value(value)?)
}

async fn dispatch(plugin: &dyn CatalogPlugin, mut request: Value) -> Result<Value, RequestError> {
    let op = match request.as_object_mut().and_then(|o| o.remove("op")) {
        Some(Value::String(op)) => op,
        _ => return Err(RequestError::MissingOp),
    };

    tracing::debug!(op = %op, "Handling request");
    match op.as_str() {
        "metadata" => ok(plugin.metadata()),
        "configSchema" => Ok(plugin.config_schema()),
        "importConfigSchema" => ok(plugin.import_config_schema()),
        "prepare" => ok(plugin.prepare(context(request)?).await?),
        "list" => ok(plugin.list(context(request)?).await?),
        "getResource" => ok(plugin.get_resource(context(request)?).await?),
        "downloadResource" => ok(plugin.download_resource(context(request)?).await?),
        "fetchResource" => ok(plugin.fetch_resource(context(request)?).await?),
        "publishDataset" => ok(plugin.publish_dataset(context(request)?).await?),
        "deleteDataset" => {
            plugin.delete_dataset(context(request)?).await?;
            Ok(Value::Null)
        }
        other => Err(RequestError::UnknownOp(other.to_string())),
    }
}

/// Handle one request line and produce the response object.
pub async fn handle_line(plugin: &dyn CatalogPlugin, line: &str) -> Value {
    let result = match serde_json::from_str::<Value>(line) {
        Ok(request) => dispatch(plugin, request).await,
        Err(e) => Err(RequestError::Malformed(e)),
    };

    match result {
        Ok(value) => json!({ "ok": value }),
        Err(e) => {
            let message = error_chain(&e);
            tracing::warn!(error = %message, "Request failed");
            json!({ "error": message })
        }
    }
}
