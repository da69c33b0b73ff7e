//! Narrow seams to the chains: the user's wallet on the source chain and a
//! read-only client for the destination chain.
//!
//! - [`SourceWallet`] - connected account, balance, transaction submission
//! - [`DestinationChain`] - waits for a transaction and returns its logs
//!
//! See [`crate::provider`] for the alloy-backed implementations.

use alloy::primitives::{Address, Log, TxHash, U256};

use crate::error::LicenseError;
use crate::response::BridgeTransaction;

/// Wallet connected on the source chain. Never exposes key material.
pub trait SourceWallet: Send + Sync {
    /// Active account, or `None` when no wallet is connected.
    fn address(&self) -> Option<Address>;

    /// Native balance of the active account, in wei.
    fn balance(&self) -> impl std::future::Future<Output = Result<U256, LicenseError>> + Send;

    /// Sign and broadcast `tx` from the active account, returning its hash as
    /// soon as the node accepts it.
    fn submit_transaction(
        &self,
        tx: &BridgeTransaction,
    ) -> impl std::future::Future<Output = Result<TxHash, LicenseError>> + Send;
}

/// Read access to the destination chain.
pub trait DestinationChain: Send + Sync {
    /// Wait until `tx_hash` is mined and return the logs it emitted.
    fn wait_for_receipt_logs(
        &self,
        tx_hash: TxHash,
    ) -> impl std::future::Future<Output = Result<Vec<Log>, LicenseError>> + Send;
}
