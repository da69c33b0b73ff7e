use alloy::primitives::TxHash;

use crate::wallet::SourceWallet;
use crate::{BridgeOrderResponse, LicenseError};

/// Submit the bridge order's source transaction from `wallet`.
///
/// `to`, `data` and `value` are passed through exactly as the aggregator
/// returned them. This is the only irreversible step of a purchase: once the
/// hash is returned the payment cannot be cancelled.
pub async fn execute_payment<W: SourceWallet>(
    wallet: &W,
    order: &BridgeOrderResponse,
) -> Result<TxHash, LicenseError> {
    let from = wallet
        .address()
        .ok_or_else(|| LicenseError::WalletError("no wallet connected".to_string()))?;

    let tx_hash = wallet.submit_transaction(&order.tx).await?;

    tracing::info!(
        %from,
        order_id = %order.order_id,
        to = %order.tx.to,
        value = %order.tx.value,
        tx = %tx_hash,
        "cross-chain payment transaction sent"
    );
    Ok(tx_hash)
}
