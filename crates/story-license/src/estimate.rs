//! Cost quotes for a license purchase, in ETH on the source chain.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::amount::{format_units_fixed, parse_price};
use crate::order::OrderPurpose;
use crate::wallet::SourceWallet;
use crate::{DlnClient, LicenseError, PaymentIntent, NATIVE_DECIMALS};

/// Decimal places shown for ETH amounts.
pub const DISPLAY_PLACES: u32 = 6;

/// What a license currently costs on the source chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    /// Native value the order transaction carries, in wei.
    pub value_wei: U256,
    /// `value_wei` in ETH, rounded to six decimals.
    pub eth: String,
    pub order_id: String,
}

impl CostEstimate {
    pub fn is_affordable(&self, balance: U256) -> bool {
        self.value_wei <= balance
    }
}

/// Quote the ETH cost of one license for `sender`.
///
/// The hook receiver is set to `sender` itself; the license receiver does
/// not take part in DLN's fee computation, so the quote is the same for any
/// receiver.
pub async fn estimate_cost(
    client: &DlnClient,
    sender: Address,
) -> Result<CostEstimate, LicenseError> {
    let config = client.config();
    let amount = parse_price(&config.license_price, NATIVE_DECIMALS)?;
    let intent = PaymentIntent::new(
        config.ip_asset_id,
        &config.license_terms_id,
        &amount.to_string(),
        sender,
        sender,
    )?;

    let order = client.create_order(&intent, OrderPurpose::Quote).await?;
    let value_wei: U256 = order.tx.value.parse().map_err(|e| {
        LicenseError::UpstreamError(format!("invalid tx.value '{}': {e}", order.tx.value))
    })?;

    let estimate = CostEstimate {
        value_wei,
        eth: format_units_fixed(value_wei, NATIVE_DECIMALS, DISPLAY_PLACES),
        order_id: order.order_id,
    };
    tracing::info!(eth = %estimate.eth, wei = %estimate.value_wei, "license cost estimated");
    Ok(estimate)
}

/// Whether `wallet` can pay `estimate`. Returns the balance alongside the answer.
pub async fn check_balance<W: SourceWallet>(
    wallet: &W,
    estimate: &CostEstimate,
) -> Result<(bool, U256), LicenseError> {
    let balance = wallet.balance().await?;
    let affordable = estimate.is_affordable(balance);
    if !affordable {
        tracing::warn!(
            needed = %estimate.eth,
            balance = %format_units_fixed(balance, NATIVE_DECIMALS, DISPLAY_PLACES),
            "insufficient balance for license purchase"
        );
    }
    Ok((affordable, balance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dln_client::tests::{order_body, test_config};
    use crate::BridgeTransaction;
    use alloy::primitives::{address, TxHash};
    use httpmock::prelude::*;

    const SENDER: Address = address!("0x1111111111111111111111111111111111111111");

    #[tokio::test]
    async fn test_estimate_uses_quote_and_sender_as_receiver() {
        let server = MockServer::start();
        let mut body = order_body();
        body["tx"]["value"] = serde_json::json!("1234567890123456");
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1.0/dln/order/create-tx")
                .query_param("enableEstimate", "false")
                .query_param("dstChainTokenOutAmount", "10000000000000")
                .query_param("senderAddress", SENDER.to_string());
            then.status(200).json_body_obj(&body);
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let estimate = estimate_cost(&client, SENDER).await.unwrap();

        assert_eq!(estimate.value_wei, U256::from(1_234_567_890_123_456u64));
        assert_eq!(estimate.eth, "0.001235");
        assert_eq!(estimate.order_id, "0x4a8e1c2b");
        mock.assert();
    }

    #[tokio::test]
    async fn test_estimate_rejects_bad_value() {
        let server = MockServer::start();
        let mut body = order_body();
        body["tx"]["value"] = serde_json::json!("about a dollar");
        server.mock(|when, then| {
            when.method(GET).path("/v1.0/dln/order/create-tx");
            then.status(200).json_body_obj(&body);
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let err = estimate_cost(&client, SENDER).await.unwrap_err();
        assert!(matches!(err, LicenseError::UpstreamError(_)));
    }

    struct FundedWallet(U256);

    impl SourceWallet for FundedWallet {
        fn address(&self) -> Option<Address> {
            Some(SENDER)
        }

        async fn balance(&self) -> Result<U256, LicenseError> {
            Ok(self.0)
        }

        async fn submit_transaction(&self, _tx: &BridgeTransaction) -> Result<TxHash, LicenseError> {
            Err(LicenseError::WalletError("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn test_check_balance() {
        let estimate = CostEstimate {
            value_wei: U256::from(1_000u64),
            eth: "0.000000".to_string(),
            order_id: "0x1".to_string(),
        };

        let (ok, balance) = check_balance(&FundedWallet(U256::from(1_000u64)), &estimate)
            .await
            .unwrap();
        assert!(ok);
        assert_eq!(balance, U256::from(1_000u64));

        let (ok, _) = check_balance(&FundedWallet(U256::from(999u64)), &estimate)
            .await
            .unwrap();
        assert!(!ok);
    }
}
