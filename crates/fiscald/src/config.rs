//! Daemon configuration.
//!
//! Defaults suit local development; production deployments override through
//! the environment. The development key is a fixed non-secret value, so the
//! only hard validation is refusing an all-zero key, which usually means a
//! truncated or unset override.

use anyhow::{bail, Context, Result};

/// Development-only key material; override in any real deployment.
const DEV_KEY: [u8; 32] = *b"fiscaldoc-development-key-32byte";
const DEV_NONCE: [u8; 12] = *b"fd-nonce-001";

const DEFAULT_HTTP_PORT: u16 = 8080;

/// Runtime configuration assembled from defaults and env overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP gateway binds on (`FD_HTTP_PORT`).
    pub http_port: u16,
    /// 256-bit payload encryption key (`FD_ENCRYPTION_KEY`, 64 hex chars).
    pub encryption_key: [u8; 32],
    /// 96-bit encryption nonce (`FD_ENCRYPTION_NONCE`, 24 hex chars).
    pub encryption_nonce: [u8; 12],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            encryption_key: DEV_KEY,
            encryption_nonce: DEV_NONCE,
        }
    }
}

impl AppConfig {
    /// Load configuration, applying env overrides over the defaults.
    ///
    /// # Errors
    ///
    /// Malformed overrides (unparsable port, wrong-length hex) and an
    /// all-zero key are rejected.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("FD_HTTP_PORT") {
            config.http_port = port
                .parse()
                .with_context(|| format!("Invalid FD_HTTP_PORT: {port}"))?;
        }
        if let Ok(key_hex) = std::env::var("FD_ENCRYPTION_KEY") {
            config.encryption_key =
                parse_hex(&key_hex).context("Invalid FD_ENCRYPTION_KEY (need 64 hex chars)")?;
        }
        if let Ok(nonce_hex) = std::env::var("FD_ENCRYPTION_NONCE") {
            config.encryption_nonce = parse_hex(&nonce_hex)
                .context("Invalid FD_ENCRYPTION_NONCE (need 24 hex chars)")?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.encryption_key.iter().all(|&b| b == 0) {
            bail!("Refusing to start with an all-zero encryption key");
        }
        Ok(())
    }
}

fn parse_hex<const N: usize>(hex_str: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(hex_str.trim()).context("Not valid hex")?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("Expected {N} bytes, got {len}"))
}
