use serde::{Deserialize, Serialize};

use crate::LicenseError;

/// Ready-to-sign source chain transaction returned by `create-tx`.
///
/// Fields are kept exactly as the aggregator sent them; the wallet layer parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeTransaction {
    pub to: String,
    pub data: String,
    /// Native value in wei, as a decimal string.
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTokenEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_operating_expense: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationTokenEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_theoretical_amount: Option<String>,
}

/// Amount estimation attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEstimation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_chain_token_in: Option<SourceTokenEstimate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_chain_token_out: Option<DestinationTokenEstimate>,
}

/// Validated response of the DLN `create-tx` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeOrderResponse {
    pub tx: BridgeTransaction,
    pub estimation: OrderEstimation,
    pub order_id: String,
}

/// Raw `create-tx` body before validation. Any top-level field may be missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrderResponse {
    tx: Option<BridgeTransaction>,
    estimation: Option<OrderEstimation>,
    order_id: Option<String>,
}

impl BridgeOrderResponse {
    /// Parse and validate an untrusted `create-tx` body.
    ///
    /// Fails with [`LicenseError::UpstreamError`] unless `tx`, `estimation` and a
    /// non-empty `orderId` are all present.
    pub fn from_json(body: &[u8]) -> Result<Self, LicenseError> {
        let raw: RawOrderResponse = serde_json::from_slice(body).map_err(|e| {
            LicenseError::UpstreamError(format!("unparseable create-tx response: {e}"))
        })?;

        let mut missing = Vec::new();
        if raw.tx.is_none() {
            missing.push("tx");
        }
        if raw.estimation.is_none() {
            missing.push("estimation");
        }
        if raw.order_id.as_deref().map_or(true, str::is_empty) {
            missing.push("orderId");
        }

        match (raw.tx, raw.estimation, raw.order_id) {
            (Some(tx), Some(estimation), Some(order_id)) if missing.is_empty() => Ok(Self {
                tx,
                estimation,
                order_id,
            }),
            _ => Err(LicenseError::UpstreamError(format!(
                "invalid create-tx response: missing required fields {missing:?}"
            ))),
        }
    }
}

/// `transactionHash` entry inside the fulfillment metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionHashValue {
    string_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FulfilledEventMetadata {
    transaction_hash: Option<TransactionHashValue>,
}

/// Subset of the DLN stats order record used for destination resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
    #[serde(default)]
    fulfilled_dst_event_metadata: Option<FulfilledEventMetadata>,
}

impl OrderStatusResponse {
    /// Destination chain transaction hash, once the order has been fulfilled.
    pub fn destination_tx_hash(&self) -> Option<&str> {
        self.fulfilled_dst_event_metadata
            .as_ref()?
            .transaction_hash
            .as_ref()?
            .string_value
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}
