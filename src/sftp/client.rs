//! SFTP client for establishing connections

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Config};
use russh_sftp::client::SftpSession as RusshSftpSession;
use secrecy::ExposeSecret;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::SftpDefaults;
use crate::error::SftpError;
use crate::security_log;

use super::auth::ResolvedAuth;
use super::config::ConnectParams;
use super::handler::ClientHandler;
use super::remote::{Connector, RemoteFs};
use super::session::SftpSession;

/// Opens real SFTP sessions with russh
pub struct SftpClient {
    config: Arc<Config>,
    connection_timeout: Duration,
}

impl Default for SftpClient {
    fn default() -> Self {
        Self::new(&SftpDefaults::default())
    }
}

impl SftpClient {
    pub fn new(settings: &SftpDefaults) -> Self {
        let keepalive_interval = match settings.keepalive_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let config = Config {
            inactivity_timeout: Some(Duration::from_secs(3600)),
            keepalive_interval,
            keepalive_max: 3,
            ..Default::default()
        };

        Self {
            config: Arc::new(config),
            connection_timeout: settings.connection_timeout(),
        }
    }

    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Connect to a host and establish an SFTP session
    pub async fn open(&self, params: &ConnectParams) -> Result<SftpSession, SftpError> {
        let addr = format!("{}:{}", params.host, params.port);

        let stream = timeout(self.connection_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| SftpError::ConnectionFailed(format!("Connection timed out to {}", addr)))?
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to connect to {}: {}", addr, e))
            })?;

        // The handshake, auth and subsystem setup share one more timeout window
        match timeout(self.connection_timeout, self.establish_sftp_session(params, stream)).await {
            Ok(result) => result,
            Err(_) => Err(SftpError::ConnectionFailed(format!(
                "SFTP session setup timed out for {}",
                addr
            ))),
        }
    }

    async fn establish_sftp_session(
        &self,
        params: &ConnectParams,
        stream: TcpStream,
    ) -> Result<SftpSession, SftpError> {
        let handler = ClientHandler::new(params.host.clone(), params.port);

        let mut handle = client::connect_stream(self.config.clone(), stream, handler)
            .await
            .map_err(|e| {
                SftpError::ConnectionFailed(format!(
                    "SSH handshake failed for {}:{}: {}",
                    params.host, params.port, e
                ))
            })?;

        let auth = ResolvedAuth::resolve(&params.credential)?;
        self.authenticate(&mut handle, params, auth).await?;

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| SftpError::ConnectionFailed(format!("Failed to open channel: {}", e)))?;

        channel
            .request_subsystem(false, "sftp")
            .await
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to request SFTP subsystem: {}", e))
            })?;

        let sftp = RusshSftpSession::new(channel.into_stream())
            .await
            .map_err(|e| {
                SftpError::ConnectionFailed(format!("Failed to initialize SFTP session: {}", e))
            })?;

        security_log::log_sftp_connect(&params.host, params.port, &params.login);

        Ok(SftpSession::new(
            sftp,
            handle,
            params.host.clone(),
            params.port,
        ))
    }

    async fn authenticate(
        &self,
        handle: &mut client::Handle<ClientHandler>,
        params: &ConnectParams,
        auth: ResolvedAuth,
    ) -> Result<(), SftpError> {
        let (host, port, login) = (params.host.as_str(), params.port, params.login.as_str());
        let method_name = auth.method_name();

        security_log::log_auth_attempt(host, port, login, method_name);

        let auth_result = match auth {
            // expose_secret() only at the point of authentication
            ResolvedAuth::Password(password) => {
                handle
                    .authenticate_password(login, password.expose_secret())
                    .await
            }
            ResolvedAuth::PublicKey(key) => handle.authenticate_publickey(login, key).await,
        };

        let auth_result = match auth_result {
            Ok(result) => result,
            Err(e) => {
                let reason = format!("{} auth failed: {}", method_name, e);
                security_log::log_auth_failure(host, port, login, method_name, &reason);
                return Err(SftpError::ConnectionFailed(reason));
            }
        };

        if !auth_result.success() {
            let reason = "Authentication rejected by server";
            security_log::log_auth_failure(host, port, login, method_name, reason);
            return Err(SftpError::ConnectionFailed(reason.to_string()));
        }

        security_log::log_auth_success(host, port, login, method_name);
        Ok(())
    }
}

#[async_trait]
impl Connector for SftpClient {
    async fn connect(&self, params: &ConnectParams) -> Result<Arc<dyn RemoteFs>, SftpError> {
        let session = self.open(params).await?;
        Ok(Arc::new(session))
    }
}
