//! SFTP catalog configuration and credential splitting

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::Secrets;
use crate::error::{CatalogError, SftpError};
use crate::security_log;
use crate::validation;

/// Value shown in place of a secret that lives in the secret store
pub const PLACEHOLDER: &str = "********";

/// Catalog configuration as submitted by the host
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SftpConfig {
    /// Host name or address of the SFTP server
    pub url: String,
    pub port: u16,
    pub login: String,
    pub connection_key: ConnectionKey,
}

impl std::fmt::Debug for SftpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpConfig")
            .field("url", &self.url)
            .field("port", &self.port)
            .field("login", &self.login)
            .field("connection_key", &self.connection_key)
            .finish()
    }
}

/// How the catalog authenticates, with the (possibly redacted) secret
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key")]
pub enum ConnectionKey {
    #[serde(rename = "sshKey")]
    SshKey {
        #[serde(rename = "sshKey", default)]
        ssh_key: String,
    },
    #[serde(rename = "password")]
    Password {
        #[serde(default)]
        password: String,
    },
}

impl std::fmt::Debug for ConnectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.value() == PLACEHOLDER {
            PLACEHOLDER
        } else if self.value().is_empty() {
            ""
        } else {
            "[REDACTED]"
        };
        f.debug_struct("ConnectionKey")
            .field("key", &self.field())
            .field("value", &shown)
            .finish()
    }
}

impl ConnectionKey {
    /// Field name shared by the config and the secret store
    pub fn field(&self) -> &'static str {
        match self {
            ConnectionKey::SshKey { .. } => "sshKey",
            ConnectionKey::Password { .. } => "password",
        }
    }

    /// Field name of the other method, whose secret becomes stale
    fn other_field(&self) -> &'static str {
        match self {
            ConnectionKey::SshKey { .. } => "password",
            ConnectionKey::Password { .. } => "sshKey",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ConnectionKey::SshKey { ssh_key } => ssh_key,
            ConnectionKey::Password { password } => password,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self {
            ConnectionKey::SshKey { ssh_key } => ssh_key,
            ConnectionKey::Password { password } => password,
        }
    }

    /// Inline value usable as a credential: neither empty nor the placeholder
    fn inline_secret(&self) -> Option<&str> {
        let value = self.value();
        (!value.is_empty() && value != PLACEHOLDER).then_some(value)
    }
}

impl SftpConfig {
    /// Decode the host's JSON, reporting unknown connection methods by name.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CatalogError> {
        if let Some(tag) = value
            .get("connectionKey")
            .and_then(|k| k.get("key"))
            .and_then(|k| k.as_str())
        {
            if tag != "sshKey" && tag != "password" {
                return Err(CatalogError::UnsupportedConnectionMethod(tag.to_string()));
            }
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// `host:port` as shown in resource origins
    pub fn origin(&self) -> String {
        format!("{}:{}", self.url, self.port)
    }
}

/// Credential handed to the transport
#[derive(Clone)]
pub enum Credential {
    /// OpenSSH or PEM private key text
    PrivateKey(SecretString),
    Password(SecretString),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::PrivateKey(_) => f.debug_tuple("PrivateKey").field(&"[KEY]").finish(),
            Credential::Password(_) => f.debug_tuple("Password").field(&"[REDACTED]").finish(),
        }
    }
}

/// Everything needed to open one SFTP connection
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub login: String,
    pub credential: Credential,
}

impl ConnectParams {
    /// Pair the config with the secret its connection method selects.
    ///
    /// The secret store wins; an inline value is used for configs that were
    /// never prepared.
    pub fn resolve(config: &SftpConfig, secrets: &Secrets) -> Result<Self, SftpError> {
        validation::validate_hostname(&config.url)
            .and_then(|_| validation::validate_port(config.port))
            .and_then(|_| validation::validate_login(&config.login))
            .map_err(|e| SftpError::ConnectionFailed(e.to_string()))?;

        let field = config.connection_key.field();
        let secret = secrets
            .secret(field)
            .or_else(|| {
                config
                    .connection_key
                    .inline_secret()
                    .map(|v| SecretString::from(v.to_string()))
            })
            .ok_or_else(|| {
                SftpError::ConnectionFailed(format!("No {} stored for this catalog", field))
            })?;

        let credential = match config.connection_key {
            ConnectionKey::SshKey { .. } => Credential::PrivateKey(secret),
            ConnectionKey::Password { .. } => Credential::Password(secret),
        };

        Ok(Self {
            host: config.url.trim().to_string(),
            port: config.port,
            login: config.login.trim().to_string(),
            credential,
        })
    }

    pub fn method_name(&self) -> &'static str {
        match self.credential {
            Credential::PrivateKey(_) => "publickey",
            Credential::Password(_) => "password",
        }
    }
}

/// Move a freshly typed secret out of the config into the secret store.
///
/// Returns new copies; the inputs are left untouched.
/// - empty value: the stored secret is removed
/// - placeholder: nothing changes, the stored secret stays valid
/// - anything else: stored as the new secret, placeholder put in the config
///
/// The secret of the other connection method is always dropped.
pub fn mask_credentials(config: &SftpConfig, secrets: &Secrets) -> (SftpConfig, Secrets) {
    let mut config = config.clone();
    let mut secrets = secrets.clone();

    let key = &mut config.connection_key;
    let field = key.field();

    if secrets.remove(key.other_field()) {
        security_log::log_credential_cleared(key.other_field());
    }

    let value = key.value_mut();
    if value.is_empty() {
        if secrets.remove(field) {
            security_log::log_credential_cleared(field);
        }
    } else if value.as_str() != PLACEHOLDER {
        secrets.insert(field, std::mem::replace(value, PLACEHOLDER.to_string()));
        security_log::log_credential_masked(field);
    }

    (config, secrets)
}

/// Settings form rendered by the host
pub fn config_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "title": "Configuration SFTP",
        "required": ["url", "port", "login", "connectionKey"],
        "properties": {
            "url": {
                "type": "string",
                "title": "Adresse du serveur",
                "minLength": 1
            },
            "port": {
                "type": "integer",
                "title": "Port",
                "minimum": 1,
                "maximum": 65535,
                "default": 22
            },
            "login": {
                "type": "string",
                "title": "Identifiant",
                "minLength": 1
            },
            "connectionKey": {
                "type": "object",
                "title": "Méthode d'authentification",
                "oneOf": [
                    {
                        "title": "Clé SSH",
                        "required": ["key", "sshKey"],
                        "properties": {
                            "key": { "const": "sshKey" },
                            "sshKey": { "type": "string", "title": "Clé privée" }
                        }
                    },
                    {
                        "title": "Mot de passe",
                        "required": ["key", "password"],
                        "properties": {
                            "key": { "const": "password" },
                            "password": { "type": "string", "title": "Mot de passe" }
                        }
                    }
                ]
            }
        }
    })
}
