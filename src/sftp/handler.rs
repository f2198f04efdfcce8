use russh::ChannelId;
use russh::client::{Handler, Session};
use russh::keys::{HashAlg, PublicKey};

use crate::error::SftpError;
use crate::security_log;

/// russh client handler for unattended catalog connections.
///
/// There is no operator to confirm an unknown host key, so every key is
/// accepted and its fingerprint written to the security log.
pub struct ClientHandler {
    host: String,
    port: u16,
}

impl ClientHandler {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }
}

impl Handler for ClientHandler {
    type Error = SftpError;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        let fingerprint = server_public_key.fingerprint(HashAlg::Sha256).to_string();
        let key_type = server_public_key.algorithm().as_str().to_string();
        security_log::log_host_key_unverified(&self.host, self.port, &fingerprint, &key_type);
        Ok(true)
    }

    async fn channel_eof(
        &mut self,
        _channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn channel_close(
        &mut self,
        _channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}
