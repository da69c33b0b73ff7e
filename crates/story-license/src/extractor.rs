//! Recovers the minted license token id from a Story transaction.

use alloy::primitives::{Log, TxHash, U256};
use alloy::sol_types::SolEvent;

use crate::wallet::DestinationChain;
use crate::{LicenseError, LicenseTokenMinted};

/// Token id from the first `LicenseTokenMinted` log in `logs`.
///
/// Logs from other contracts or events in the same transaction don't decode
/// and are skipped.
pub fn find_license_token_id(logs: &[Log]) -> Option<U256> {
    logs.iter().find_map(|log| match LicenseTokenMinted::decode_log(log) {
        Ok(event) => Some(event.tokenId),
        Err(e) => {
            tracing::trace!(address = %log.address, error = %e, "skipping unrelated log");
            None
        }
    })
}

/// Wait for `tx_hash` on the destination chain and extract the license token id.
///
/// `Ok(None)` means the transaction was mined but minted no license token.
pub async fn license_token_id<D: DestinationChain>(
    chain: &D,
    tx_hash: TxHash,
) -> Result<Option<U256>, LicenseError> {
    let logs = chain.wait_for_receipt_logs(tx_hash).await?;
    let token_id = find_license_token_id(&logs);

    match token_id {
        Some(id) => tracing::info!(%tx_hash, token_id = %id, "license token minted"),
        None => tracing::warn!(%tx_hash, logs = logs.len(), "no LicenseTokenMinted event in receipt"),
    }
    Ok(token_id)
}
