use core::fmt;
use std::time::Duration;

use zeroize::Zeroize;

use crate::error::{ConfigError, Result};
use crate::types::PrivilegeLevel;

const MAX_USERNAME_LEN: usize = 16;
const MAX_PASSWORD_LEN: usize = 20;
const MAX_CIPHER_SUITE_ID: u8 = 17;
const MAX_SUPPORTED_CIPHER_SUITE_ID: u8 = 3;

/// Byte buffer that is wiped on drop and never printed.
#[derive(Clone, Default)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Wrap secret bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the secret.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for an empty secret.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<secret>")
    }
}

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Client settings, validated before any I/O.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    username: Vec<u8>,
    password: SecretBytes,
    privilege_level: PrivilegeLevel,
    cipher_suite_id: u8,
    timeout: Duration,
    retries: u32,
    fru_read_bytes: u8,
    sel_reservation_retries: u32,
    clear_poll_interval: Duration,
    clear_poll_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: Vec::new(),
            password: SecretBytes::default(),
            privilege_level: PrivilegeLevel::Administrator,
            cipher_suite_id: 3,
            timeout: Duration::from_secs(5),
            retries: 0,
            fru_read_bytes: 16,
            sel_reservation_retries: 3,
            clear_poll_interval: Duration::from_secs(1),
            clear_poll_limit: 10,
        }
    }
}

impl ClientConfig {
    /// Create a [`ClientConfigBuilder`] with default settings.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check every setting.
    pub fn validate(&self) -> Result<()> {
        if self.username.len() > MAX_USERNAME_LEN {
            return Err(ConfigError::UsernameTooLong(self.username.len()).into());
        }
        if self.password.len() > MAX_PASSWORD_LEN {
            return Err(ConfigError::PasswordTooLong(self.password.len()).into());
        }
        if self.cipher_suite_id > MAX_CIPHER_SUITE_ID {
            return Err(ConfigError::InvalidCipherSuite(self.cipher_suite_id).into());
        }
        if self.cipher_suite_id > MAX_SUPPORTED_CIPHER_SUITE_ID {
            return Err(ConfigError::UnsupportedCipherSuite(self.cipher_suite_id).into());
        }
        if self.privilege_level == PrivilegeLevel::Oem {
            return Err(ConfigError::UnsupportedPrivilege(self.privilege_level).into());
        }
        if self.fru_read_bytes == 0 {
            return Err(ConfigError::ZeroFruReadSize.into());
        }
        Ok(())
    }

    /// Username bytes.
    pub fn username(&self) -> &[u8] {
        &self.username
    }

    /// Password bytes.
    pub fn password(&self) -> &[u8] {
        self.password.expose()
    }

    /// Requested session privilege level.
    pub fn privilege_level(&self) -> PrivilegeLevel {
        self.privilege_level
    }

    /// RMCP+ cipher suite ID.
    pub fn cipher_suite_id(&self) -> u8 {
        self.cipher_suite_id
    }

    /// Per-request transport deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Extra attempts after a timeout.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// FRU chunk size in bytes.
    pub fn fru_read_bytes(&self) -> u8 {
        self.fru_read_bytes
    }

    /// Consecutive SEL reservation re-acquisitions allowed during a scan.
    pub fn sel_reservation_retries(&self) -> u32 {
        self.sel_reservation_retries
    }

    /// Delay between clear-SEL polls.
    pub fn clear_poll_interval(&self) -> Duration {
        self.clear_poll_interval
    }

    /// Clear-SEL commands allowed before giving up.
    pub fn clear_poll_limit(&self) -> u32 {
        self.clear_poll_limit
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the username (bytes).
    pub fn username_bytes(mut self, username: impl Into<Vec<u8>>) -> Self {
        self.config.username = username.into();
        self
    }

    /// Set the username.
    pub fn username(self, username: impl AsRef<str>) -> Self {
        self.username_bytes(username.as_ref().as_bytes())
    }

    /// Set the password (bytes).
    pub fn password_bytes(mut self, password: impl Into<Vec<u8>>) -> Self {
        self.config.password = SecretBytes::new(password.into());
        self
    }

    /// Set the password.
    pub fn password(self, password: impl AsRef<str>) -> Self {
        self.password_bytes(password.as_ref().as_bytes())
    }

    /// Set the requested session privilege level.
    pub fn privilege_level(mut self, level: PrivilegeLevel) -> Self {
        self.config.privilege_level = level;
        self
    }

    /// Set the RMCP+ cipher suite ID (0-3 supported).
    pub fn cipher_suite_id(mut self, id: u8) -> Self {
        self.config.cipher_suite_id = id;
        self
    }

    /// Set the per-request transport deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set extra attempts after a timeout (0 means one attempt).
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the FRU chunk size (default 16, most controllers accept 63).
    pub fn fru_read_bytes(mut self, bytes: u8) -> Self {
        self.config.fru_read_bytes = bytes;
        self
    }

    /// Set the SEL reservation re-acquisition budget.
    pub fn sel_reservation_retries(mut self, retries: u32) -> Self {
        self.config.sel_reservation_retries = retries;
        self
    }

    /// Set the delay between clear-SEL polls.
    pub fn clear_poll_interval(mut self, interval: Duration) -> Self {
        self.config.clear_poll_interval = interval;
        self
    }

    /// Set the clear-SEL command budget.
    pub fn clear_poll_limit(mut self, limit: u32) -> Self {
        self.config.clear_poll_limit = limit;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults() {
        let config = ClientConfig::builder()
            .username("admin")
            .password("secret")
            .build()
            .expect("valid config");
        assert_eq!(config.privilege_level(), PrivilegeLevel::Administrator);
        assert_eq!(config.cipher_suite_id(), 3);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retries(), 0);
        assert_eq!(config.fru_read_bytes(), 16);
        assert_eq!(config.clear_poll_limit(), 10);
        assert_eq!(config.password(), b"secret");
    }

    #[test]
    fn rejects_oversized_credentials() {
        let err = ClientConfig::builder()
            .username("u".repeat(17))
            .build()
            .expect_err("username");
        assert!(matches!(
            err,
            Error::Config(ConfigError::UsernameTooLong(17))
        ));

        let err = ClientConfig::builder()
            .password("p".repeat(21))
            .build()
            .expect_err("password");
        assert!(matches!(
            err,
            Error::Config(ConfigError::PasswordTooLong(21))
        ));
    }

    #[test]
    fn cipher_suite_and_privilege() {
        let err = ClientConfig::builder()
            .cipher_suite_id(18)
            .build()
            .expect_err("invalid");
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidCipherSuite(18))
        ));

        let err = ClientConfig::builder()
            .cipher_suite_id(17)
            .build()
            .expect_err("unsupported");
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnsupportedCipherSuite(17))
        ));

        let err = ClientConfig::builder()
            .privilege_level(PrivilegeLevel::Oem)
            .build()
            .expect_err("privilege");
        assert!(matches!(
            err,
            Error::Config(ConfigError::UnsupportedPrivilege(PrivilegeLevel::Oem))
        ));
    }

    #[test]
    fn zero_fru_chunk_is_rejected() {
        let err = ClientConfig::builder()
            .fru_read_bytes(0)
            .build()
            .expect_err("chunk");
        assert!(matches!(err, Error::Config(ConfigError::ZeroFruReadSize)));
    }

    #[test]
    fn password_is_redacted() {
        let config = ClientConfig::builder()
            .password("hunter2")
            .build()
            .expect("valid config");
        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<secret>"));
    }
}
