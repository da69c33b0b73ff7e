use alloy::primitives::TxHash;

use crate::LicenseConfig;

pub fn base_tx_url(config: &LicenseConfig, tx_hash: TxHash) -> String {
    format!("{}/tx/{tx_hash}", config.base_explorer.trim_end_matches('/'))
}

pub fn story_tx_url(config: &LicenseConfig, tx_hash: TxHash) -> String {
    format!("{}/tx/{tx_hash}", config.story_explorer.trim_end_matches('/'))
}

/// Story portal page for the transaction that minted the license token.
pub fn license_token_url(config: &LicenseConfig, story_tx_hash: TxHash) -> String {
    format!(
        "{}/transactions/{story_tx_hash}",
        config.story_portal_explorer.trim_end_matches('/')
    )
}

/// `0x8532e9c0...4e5f6071` style abbreviation for display.
pub fn short_hash(tx_hash: TxHash) -> String {
    let full = tx_hash.to_string();
    format!("{}...{}", &full[..10], &full[full.len() - 8..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    const HASH: TxHash =
        b256!("8532e9c0b8b5e3b7f0c1a2d3e4f5061728394a5b6c7d8e9f0a1b2c3d4e5f6071");

    #[test]
    fn test_links() {
        let config = LicenseConfig::default();
        assert_eq!(
            base_tx_url(&config, HASH),
            "https://basescan.org/tx/0x8532e9c0b8b5e3b7f0c1a2d3e4f5061728394a5b6c7d8e9f0a1b2c3d4e5f6071"
        );
        assert_eq!(
            story_tx_url(&config, HASH),
            "https://www.storyscan.io/tx/0x8532e9c0b8b5e3b7f0c1a2d3e4f5061728394a5b6c7d8e9f0a1b2c3d4e5f6071"
        );
        assert_eq!(
            license_token_url(&config, HASH),
            "https://explorer.story.foundation/transactions/0x8532e9c0b8b5e3b7f0c1a2d3e4f5061728394a5b6c7d8e9f0a1b2c3d4e5f6071"
        );
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash(HASH), "0x8532e9c0...4e5f6071");
    }
}
