use alloy::primitives::{address, Address};

use crate::LicenseError;

/// Base mainnet chain ID (source chain).
pub const BASE_CHAIN_ID: u64 = 8453;

/// Story mainnet EVM chain ID (destination chain).
pub const STORY_CHAIN_ID: u64 = 1514;

/// deBridge's internal identifier for Story. DLN does not use the EVM chain id here.
pub const DLN_STORY_CHAIN_ID: u64 = 100000013;

/// Native token placeholder used by DLN for both ETH on Base and IP on Story.
pub const NATIVE_TOKEN: Address = Address::ZERO;

/// deBridge multicall on Story: receives the bridged IP, wraps it to WIP,
/// approves the licensing module and mints the license token.
pub const DEBRIDGE_MULTICALL: Address = address!("0x6429a616f76a8958e918145d64bf7681c3936d6a");

/// Story IP asset representing the licensed music track.
pub const STORY_IP_ASSET_ID: Address = address!("0xcb6B9CCae4108A103097B30cFc25e1E257D4b5Fe");

/// License terms attached to the IP asset for commercial use.
pub const IP_ASSET_LICENSE_TERMS_ID: &str = "27910";

/// Price of one commercial license, in IP/WIP.
pub const COMMERCIAL_LICENSE_PRICE: &str = "0.00001";

/// Both native tokens (ETH, IP) use 18 decimals.
pub const NATIVE_DECIMALS: u32 = 18;

/// Number of license tokens minted per purchase.
pub const LICENSE_TOKEN_AMOUNT: u64 = 1;

pub const DLN_API_URL: &str = "https://dln.debridge.finance";
pub const DLN_STATS_URL: &str = "https://api.dln.trade";
pub const BASE_RPC_URL: &str = "https://mainnet.base.org";
pub const STORY_RPC_URL: &str = "https://mainnet.storyrpc.io";

pub const BASE_EXPLORER: &str = "https://basescan.org";
pub const STORY_EXPLORER: &str = "https://www.storyscan.io";
pub const STORY_PORTAL_EXPLORER: &str = "https://explorer.story.foundation";

/// Runtime configuration for a license purchase. Defaults to mainnet Base → Story
/// with the demo IP asset; every field can be overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseConfig {
    pub source_chain_id: u64,
    pub dln_destination_chain_id: u64,
    pub multicall: Address,
    pub ip_asset_id: Address,
    pub license_terms_id: String,
    /// Human-readable price in IP, e.g. "0.00001".
    pub license_price: String,
    pub dln_api_url: String,
    pub dln_stats_url: String,
    pub base_rpc_url: String,
    pub story_rpc_url: String,
    pub base_explorer: String,
    pub story_explorer: String,
    pub story_portal_explorer: String,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            source_chain_id: BASE_CHAIN_ID,
            dln_destination_chain_id: DLN_STORY_CHAIN_ID,
            multicall: DEBRIDGE_MULTICALL,
            ip_asset_id: STORY_IP_ASSET_ID,
            license_terms_id: IP_ASSET_LICENSE_TERMS_ID.to_string(),
            license_price: COMMERCIAL_LICENSE_PRICE.to_string(),
            dln_api_url: DLN_API_URL.to_string(),
            dln_stats_url: DLN_STATS_URL.to_string(),
            base_rpc_url: BASE_RPC_URL.to_string(),
            story_rpc_url: STORY_RPC_URL.to_string(),
            base_explorer: BASE_EXPLORER.to_string(),
            story_explorer: STORY_EXPLORER.to_string(),
            story_portal_explorer: STORY_PORTAL_EXPLORER.to_string(),
        }
    }
}

impl LicenseConfig {
    /// Build a config from the process environment, falling back to mainnet defaults.
    ///
    /// Reads `DLN_API_URL`, `DLN_STATS_URL`, `BASE_RPC_URL`, `STORY_RPC_URL`,
    /// `STORY_IP_ASSET_ID`, `LICENSE_TERMS_ID` and `LICENSE_PRICE_IP`.
    pub fn from_env() -> Result<Self, LicenseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LicenseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = var("DLN_API_URL") {
            config.dln_api_url = url;
        }
        if let Some(url) = var("DLN_STATS_URL") {
            config.dln_stats_url = url;
        }
        if let Some(url) = var("BASE_RPC_URL") {
            config.base_rpc_url = url;
        }
        if let Some(url) = var("STORY_RPC_URL") {
            config.story_rpc_url = url;
        }
        if let Some(raw) = var("STORY_IP_ASSET_ID") {
            config.ip_asset_id = raw.trim().parse().map_err(|e| {
                LicenseError::ConfigError(format!("invalid STORY_IP_ASSET_ID '{raw}': {e}"))
            })?;
        }
        if let Some(raw) = var("LICENSE_TERMS_ID") {
            if !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err(LicenseError::ConfigError(format!(
                    "invalid LICENSE_TERMS_ID '{raw}': expected a decimal integer"
                )));
            }
            config.license_terms_id = raw;
        }
        if let Some(raw) = var("LICENSE_PRICE_IP") {
            crate::amount::parse_price(&raw, NATIVE_DECIMALS)?;
            config.license_price = raw;
        }

        Ok(config)
    }
}
