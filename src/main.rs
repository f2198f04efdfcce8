use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use catalog_plugins::config::{PluginSettings, paths};
use catalog_plugins::host;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with file output.
    let log_dir = paths::ensure_log_dir().ok();
    let _guard = catalog_plugins::logging::init_logging(log_dir);

    let Some(name) = std::env::args().nth(1) else {
        bail!("usage: catalog-plugins <{}>", host::PLUGIN_NAMES.join("|"));
    };

    let settings = PluginSettings::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings, using defaults: {}", e);
        PluginSettings::default()
    });

    let Some(plugin) = host::plugin_by_name(&name, &settings) else {
        bail!(
            "unknown plugin '{}', expected one of: {}",
            name,
            host::PLUGIN_NAMES.join(", ")
        );
    };

    tracing::info!("Starting {} catalog plugin", name);
    if let Some(dir) = paths::log_dir() {
        tracing::info!("Logging to {}", dir.display());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        if line.trim().is_empty() {
            continue;
        }
        let response = host::handle_line(plugin.as_ref(), &line).await;
        let mut out = serde_json::to_vec(&response).context("Failed to encode response")?;
        out.push(b'\n');
        stdout
            .write_all(&out)
            .await
            .context("Failed to write response")?;
        stdout.flush().await.context("Failed to write response")?;
    }

    tracing::info!("Input closed, exiting");
    Ok(())
}
