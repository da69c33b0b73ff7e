//! The purchase flow and the status machine the UI renders.
//!
//! `Idle` → `Minting` → `Success { record }` | `Error { reason }`
//!
//! `Success` is entered as soon as the Base transaction hash exists. The
//! destination hash and license token id are filled in afterwards on a
//! best-effort basis; failures there are logged and never change the status.

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::amount::parse_price;
use crate::estimate::{self, CostEstimate};
use crate::executor::execute_payment;
use crate::extractor::license_token_id;
use crate::order::OrderPurpose;
use crate::resolver::{resolve_destination_tx, ResolverConfig};
use crate::wallet::{DestinationChain, SourceWallet};
use crate::{parse_receiver, DlnClient, LicenseError, PaymentIntent, NATIVE_DECIMALS};

/// Shown to the user for any failure before the payment is sent. Details go to the log.
pub const PAYMENT_FAILED: &str = "Payment failed. Please try again.";

/// Hashes and token id of one purchase. Later fields stay `None` when the
/// corresponding lookup did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub source_tx_hash: TxHash,
    pub destination_tx_hash: Option<TxHash>,
    pub license_token_id: Option<U256>,
}

impl TransactionRecord {
    fn new(source_tx_hash: TxHash) -> Self {
        Self {
            source_tx_hash,
            destination_tx_hash: None,
            license_token_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PurchaseStatus {
    Idle,
    Minting,
    Success { record: TransactionRecord },
    Error { reason: String },
}

impl PurchaseStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Error { .. })
    }

    pub fn record(&self) -> Option<&TransactionRecord> {
        match self {
            Self::Success { record } => Some(record),
            _ => None,
        }
    }
}

/// Runs license purchases for one connected wallet and publishes every
/// status change on a watch channel.
pub struct LicensePurchase<W, D> {
    client: DlnClient,
    wallet: W,
    destination: D,
    resolver: ResolverConfig,
    status: watch::Sender<PurchaseStatus>,
}

impl<W: SourceWallet, D: DestinationChain> LicensePurchase<W, D> {
    pub fn new(client: DlnClient, wallet: W, destination: D) -> Self {
        let (status, _) = watch::channel(PurchaseStatus::Idle);
        Self {
            client,
            wallet,
            destination,
            resolver: ResolverConfig::default(),
            status,
        }
    }

    pub fn with_resolver_config(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn status(&self) -> PurchaseStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<PurchaseStatus> {
        self.status.subscribe()
    }

    /// Return to `Idle`, discarding the last result.
    pub fn reset(&mut self) {
        self.publish(PurchaseStatus::Idle);
    }

    /// Quote the license for the connected account and check its balance.
    ///
    /// Returns the estimate and whether the balance covers it.
    pub async fn estimate_cost(&self) -> Result<(CostEstimate, bool), LicenseError> {
        let sender = self.connected_account()?;
        let quote = estimate::estimate_cost(&self.client, sender).await?;
        let (affordable, _) = estimate::check_balance(&self.wallet, &quote).await?;
        Ok((quote, affordable))
    }

    /// Buy one license for `receiver` (a Story address) at the configured price.
    ///
    /// Input problems return `Err(ValidationError)` and leave the status
    /// untouched. Anything after that is reported through the returned status.
    pub async fn purchase(&mut self, receiver: &str) -> Result<PurchaseStatus, LicenseError> {
        self.ensure_not_minting()?;
        let sender = self.connected_account()?;
        let receiver = parse_receiver(receiver)?;

        let config = self.client.config();
        let amount = parse_price(&config.license_price, NATIVE_DECIMALS)?;
        let intent = PaymentIntent::new(
            config.ip_asset_id,
            &config.license_terms_id,
            &amount.to_string(),
            sender,
            receiver,
        )?;

        self.purchase_intent(intent).await
    }

    /// Run the flow for a prepared intent. Its sender must be the connected account.
    pub async fn purchase_intent(
        &mut self,
        intent: PaymentIntent,
    ) -> Result<PurchaseStatus, LicenseError> {
        self.ensure_not_minting()?;
        let account = self.connected_account()?;
        if intent.sender_address() != account {
            return Err(LicenseError::ValidationError(format!(
                "intent sender {} is not the connected account {account}",
                intent.sender_address()
            )));
        }

        self.publish(PurchaseStatus::Minting);
        info!(
            sender = %intent.sender_address(),
            receiver = %intent.receiver_address(),
            amount = %intent.payment_amount(),
            "starting license purchase"
        );

        let source_tx_hash = match self.send_payment(&intent).await {
            Ok(hash) => hash,
            Err(e) => {
                error!(error = %e, "license payment failed");
                self.publish(PurchaseStatus::Error {
                    reason: PAYMENT_FAILED.to_string(),
                });
                return Ok(self.status());
            }
        };

        let mut record = TransactionRecord::new(source_tx_hash);
        self.publish_record(&record);
        self.enrich(&mut record).await;

        Ok(self.status())
    }

    async fn send_payment(&self, intent: &PaymentIntent) -> Result<TxHash, LicenseError> {
        let order = self.client.create_order(intent, OrderPurpose::Submit).await?;
        execute_payment(&self.wallet, &order).await
    }

    async fn enrich(&self, record: &mut TransactionRecord) {
        let destination =
            match resolve_destination_tx(&self.client, record.source_tx_hash, &self.resolver).await {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(source = %record.source_tx_hash, error = %e, "could not resolve destination transaction");
                    return;
                }
            };
        record.destination_tx_hash = Some(destination);
        self.publish_record(record);

        match license_token_id(&self.destination, destination).await {
            Ok(Some(id)) => {
                record.license_token_id = Some(id);
                self.publish_record(record);
            }
            Ok(None) => {}
            Err(e) => warn!(%destination, error = %e, "could not read license token id"),
        }
    }

    fn connected_account(&self) -> Result<Address, LicenseError> {
        self.wallet
            .address()
            .ok_or_else(|| LicenseError::ValidationError("connect a wallet first".to_string()))
    }

    fn ensure_not_minting(&self) -> Result<(), LicenseError> {
        if matches!(*self.status.borrow(), PurchaseStatus::Minting) {
            return Err(LicenseError::ValidationError(
                "a purchase is already in progress".to_string(),
            ));
        }
        Ok(())
    }

    fn publish_record(&self, record: &TransactionRecord) {
        self.publish(PurchaseStatus::Success {
            record: record.clone(),
        });
    }

    fn publish(&self, status: PurchaseStatus) {
        tracing::debug!(?status, "purchase status changed");
        self.status.send_replace(status);
    }
}
