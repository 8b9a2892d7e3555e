//! Wallet configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default node endpoint (Sepolia test network)
pub const DEFAULT_RPC_URL: &str = "https://sepolia.infura.io/v3/your-project-id";

/// Default wallet file, relative to the working directory
pub const DEFAULT_WALLET_FILE: &str = "wallet.json";

/// Timeout applied to every node request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gap between receipt lookups while waiting for confirmation
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Receipt lookups before giving up on confirmation
pub const DEFAULT_CONFIRMATION_ATTEMPTS: u32 = 60;

/// Runtime configuration for a wallet instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub rpc_url: String,
    pub wallet_file: PathBuf,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub confirmation_attempts: u32,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            wallet_file: PathBuf::from(DEFAULT_WALLET_FILE),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            confirmation_attempts: DEFAULT_CONFIRMATION_ATTEMPTS,
        }
    }
}
