use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, Log, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;

use crate::response::BridgeTransaction;
use crate::wallet::{DestinationChain, SourceWallet};
use crate::LicenseError;

/// Default bound on transaction submission, fillers included.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// [`SourceWallet`] backed by an alloy provider that has a signer attached
/// (e.g. `ProviderBuilder::new().wallet(...)`).
pub struct ProviderWallet<P> {
    provider: P,
    account: Option<Address>,
    chain_id: u64,
    send_timeout: Duration,
}

impl<P> ProviderWallet<P> {
    /// Wallet for `account` on `chain_id`. Transactions are refused if the
    /// provider's signer does not control `account`.
    pub fn new(provider: P, account: Address, chain_id: u64) -> Self {
        Self {
            provider,
            account: Some(account),
            chain_id,
            send_timeout: SEND_TIMEOUT,
        }
    }

    /// A provider with no connected account. Every submission fails.
    pub fn disconnected(provider: P, chain_id: u64) -> Self {
        Self {
            provider,
            account: None,
            chain_id,
            send_timeout: SEND_TIMEOUT,
        }
    }

    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    fn connected_account(&self) -> Result<Address, LicenseError> {
        self.account
            .ok_or_else(|| LicenseError::WalletError("no wallet connected".to_string()))
    }
}

/// Translate the aggregator's transaction into an alloy request, field for field.
pub fn transaction_request(
    from: Address,
    chain_id: u64,
    tx: &BridgeTransaction,
) -> Result<TransactionRequest, LicenseError> {
    let to: Address = tx
        .to
        .parse()
        .map_err(|e| LicenseError::WalletError(format!("invalid tx.to '{}': {e}", tx.to)))?;
    let data: Bytes = tx
        .data
        .parse()
        .map_err(|e| LicenseError::WalletError(format!("invalid tx.data: {e}")))?;
    let value: U256 = tx
        .value
        .parse()
        .map_err(|e| LicenseError::WalletError(format!("invalid tx.value '{}': {e}", tx.value)))?;

    Ok(TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_input(data)
        .with_value(value)
        .with_chain_id(chain_id))
}

impl<P> SourceWallet for ProviderWallet<P>
where
    P: Provider + Send + Sync,
{
    fn address(&self) -> Option<Address> {
        self.account
    }

    async fn balance(&self) -> Result<U256, LicenseError> {
        let account = self.connected_account()?;
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| LicenseError::ChainError(format!("balance lookup failed: {e}")))
    }

    async fn submit_transaction(&self, tx: &BridgeTransaction) -> Result<TxHash, LicenseError> {
        let from = self.connected_account()?;
        let request = transaction_request(from, self.chain_id, tx)?;

        let pending = tokio::time::timeout(self.send_timeout, self.provider.send_transaction(request))
            .await
            .map_err(|_| {
                LicenseError::WalletError(format!("send timed out after {:?}", self.send_timeout))
            })?
            .map_err(|e| LicenseError::WalletError(format!("transaction rejected: {e}")))?;

        Ok(*pending.tx_hash())
    }
}

/// Polling budget for destination receipts.
#[derive(Debug, Clone)]
pub struct ReceiptConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
        }
    }
}

/// [`DestinationChain`] over a plain JSON-RPC provider.
pub struct RpcDestinationChain<P> {
    provider: P,
    config: ReceiptConfig,
}

impl<P> RpcDestinationChain<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: ReceiptConfig::default(),
        }
    }

    pub fn with_receipt_config(mut self, config: ReceiptConfig) -> Self {
        self.config = config;
        self
    }
}

impl<P> DestinationChain for RpcDestinationChain<P>
where
    P: Provider + Send + Sync,
{
    async fn wait_for_receipt_logs(&self, tx_hash: TxHash) -> Result<Vec<Log>, LicenseError> {
        let poll = async {
            loop {
                match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => break receipt,
                    Ok(None) => tracing::trace!(%tx_hash, "receipt not available yet"),
                    Err(e) => tracing::warn!(%tx_hash, error = %e, "receipt lookup failed, retrying"),
                }
                tokio::time::sleep(self.config.poll_interval).await;
            }
        };

        let receipt = tokio::time::timeout(self.config.timeout, poll)
            .await
            .map_err(|_| {
                LicenseError::ChainError(format!(
                    "receipt for {tx_hash} not available after {:?}",
                    self.config.timeout
                ))
            })?;

        if !receipt.status() {
            tracing::warn!(%tx_hash, "destination transaction reverted");
        }

        Ok(receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect())
    }
}
