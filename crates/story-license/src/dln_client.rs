//! HTTP client for the deBridge DLN order API and the DLN stats API.

use std::time::Duration;

use alloy::primitives::TxHash;

use crate::order::{build_order_url, OrderPurpose};
use crate::response::{BridgeOrderResponse, OrderStatusResponse};
use crate::{LicenseConfig, LicenseError, PaymentIntent};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the bridge aggregator. Performs no retries; callers decide.
#[derive(Debug, Clone)]
pub struct DlnClient {
    http: reqwest::Client,
    config: LicenseConfig,
}

impl DlnClient {
    pub fn new(config: LicenseConfig) -> Result<Self, LicenseError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| LicenseError::ConfigError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Create a client with a custom reqwest::Client.
    pub fn with_http_client(config: LicenseConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &LicenseConfig {
        &self.config
    }

    /// Request a bridge order for `intent` and validate the response shape.
    ///
    /// Fails with [`LicenseError::UpstreamError`] on transport errors, non-2xx
    /// statuses, or bodies missing `tx`, `estimation` or `orderId`.
    pub async fn create_order(
        &self,
        intent: &PaymentIntent,
        purpose: OrderPurpose,
    ) -> Result<BridgeOrderResponse, LicenseError> {
        let url = build_order_url(&self.config, intent, purpose)?;
        tracing::debug!(%url, "requesting deBridge order");

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LicenseError::UpstreamError(format!("create-tx request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LicenseError::UpstreamError(format!(
                "deBridge API error: {status}"
            )));
        }

        let body = resp.bytes().await.map_err(|e| {
            LicenseError::UpstreamError(format!("failed to read create-tx body: {e}"))
        })?;
        let order = BridgeOrderResponse::from_json(&body)?;

        tracing::info!(
            order_id = %order.order_id,
            value = %order.tx.value,
            ?purpose,
            "deBridge order created"
        );
        Ok(order)
    }

    /// Look up the DLN order created by `source_tx_hash`.
    pub async fn order_status(
        &self,
        source_tx_hash: TxHash,
    ) -> Result<OrderStatusResponse, LicenseError> {
        let url = format!(
            "{}/v1.0/Orders/creationTxHash/{source_tx_hash}",
            self.config.dln_stats_url.trim_end_matches('/')
        );

        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LicenseError::UpstreamError(format!("order status request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LicenseError::UpstreamError(format!(
                "failed to get order status: {status}"
            )));
        }

        resp.json::<OrderStatusResponse>()
            .await
            .map_err(|e| LicenseError::UpstreamError(format!("order status parse failed: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy::primitives::{address, b256};
    use httpmock::prelude::*;
    use serde_json::json;

    pub(crate) fn order_body() -> serde_json::Value {
        json!({
            "estimation": {
                "srcChainTokenIn": {
                    "amount": "4151710893817",
                    "approximateOperatingExpense": "41517108938"
                },
                "dstChainTokenOut": {
                    "amount": "10000000000000",
                    "maxTheoreticalAmount": "10000000000000"
                }
            },
            "tx": {
                "to": "0x663DC15D3C1aC63ff12E45Ab68FeA3F0a883C251",
                "data": "0xfbe16ca7",
                "value": "1004151710893817"
            },
            "orderId": "0x4a8e1c2b"
        })
    }

    pub(crate) fn test_config(server: &MockServer) -> LicenseConfig {
        LicenseConfig {
            dln_api_url: server.base_url(),
            dln_stats_url: server.base_url(),
            ..LicenseConfig::default()
        }
    }

    fn intent() -> PaymentIntent {
        PaymentIntent::new(
            crate::STORY_IP_ASSET_ID,
            "27910",
            "10000000000000",
            address!("0x1111111111111111111111111111111111111111"),
            address!("0x2222222222222222222222222222222222222222"),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_order_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1.0/dln/order/create-tx")
                .header("accept", "application/json")
                .query_param("srcChainId", "8453")
                .query_param("dstChainId", "100000013")
                .query_param("dstChainTokenOutAmount", "10000000000000")
                .query_param("enableEstimate", "true");
            then.status(200)
                .header("content-type", "application/json")
                .json_body_obj(&order_body());
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let order = client
            .create_order(&intent(), OrderPurpose::Submit)
            .await
            .unwrap();

        assert_eq!(order.order_id, "0x4a8e1c2b");
        assert_eq!(order.tx.to, "0x663DC15D3C1aC63ff12E45Ab68FeA3F0a883C251");
        assert_eq!(order.tx.value, "1004151710893817");
        mock.assert();
    }

    #[tokio::test]
    async fn test_create_order_http_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1.0/dln/order/create-tx");
            then.status(500).body("internal error");
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let err = client
            .create_order(&intent(), OrderPurpose::Quote)
            .await
            .unwrap_err();

        match err {
            LicenseError::UpstreamError(msg) => assert!(msg.contains("500"), "{msg}"),
            other => panic!("expected UpstreamError, got {other:?}"),
        }
        assert_eq!(mock.hits(), 1, "no retries expected");
    }

    #[tokio::test]
    async fn test_create_order_rejects_incomplete_body_with_200() {
        let server = MockServer::start();
        let mut body = order_body();
        body.as_object_mut().unwrap().remove("orderId");
        server.mock(|when, then| {
            when.method(GET).path("/v1.0/dln/order/create-tx");
            then.status(200)
                .header("content-type", "application/json")
                .json_body_obj(&body);
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let err = client
            .create_order(&intent(), OrderPurpose::Submit)
            .await
            .unwrap_err();
        assert!(matches!(err, LicenseError::UpstreamError(_)));
    }

    #[tokio::test]
    async fn test_custom_http_client_timeout_applies() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1.0/dln/order/create-tx");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body_obj(&order_body());
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let client = DlnClient::with_http_client(test_config(&server), http);
        let err = client
            .create_order(&intent(), OrderPurpose::Submit)
            .await
            .unwrap_err();

        match err {
            LicenseError::UpstreamError(msg) => assert!(msg.contains("create-tx request failed"), "{msg}"),
            other => panic!("expected UpstreamError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_order_status_fulfilled() {
        let server = MockServer::start();
        let source = b256!("8532e9c0b8b5e3b7f0c1a2d3e4f5061728394a5b6c7d8e9f0a1b2c3d4e5f6071");
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/v1.0/Orders/creationTxHash/{source}"));
            then.status(200).json_body_obj(&json!({
                "fulfilledDstEventMetadata": {
                    "transactionHash": {
                        "stringValue": "0x5a4106c1f00ec7ec0d0f1f0bcd2fbd2f0b0e8f3d4c9c7e2a1f0e5d6c7b8a9f01"
                    }
                }
            }));
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let status = client.order_status(source).await.unwrap();

        assert_eq!(
            status.destination_tx_hash(),
            Some("0x5a4106c1f00ec7ec0d0f1f0bcd2fbd2f0b0e8f3d4c9c7e2a1f0e5d6c7b8a9f01")
        );
        mock.assert();
    }

    #[tokio::test]
    async fn test_order_status_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_contains("/v1.0/Orders/creationTxHash/");
            then.status(404);
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let err = client.order_status(TxHash::ZERO).await.unwrap_err();
        assert!(matches!(err, LicenseError::UpstreamError(_)));
    }
}
