use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the log directory. An empty value disables file logging.
pub const LOG_DIR_ENV: &str = "CATALOG_PLUGINS_LOG_DIR";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "catalog-plugins", "catalog-plugins")
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Get the path to the settings file
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.toml"))
}

/// Ensure the config directory exists with proper permissions
pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine config directory",
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        // Set restrictive permissions on Unix (owner-only access)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))?;
        }
    }

    Ok(dir)
}

/// Get the log directory path
pub fn log_dir() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(LOG_DIR_ENV) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        return Some(PathBuf::from(trimmed));
    }

    config_dir().map(|d| d.join("logs"))
}

/// Ensure the log directory exists with proper permissions
pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    if std::env::var_os(LOG_DIR_ENV).is_none() {
        ensure_config_dir()?;
    }

    let dir = log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine log directory",
        )
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))?;
        }
    }

    Ok(dir)
}
