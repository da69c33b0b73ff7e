//! Finds the destination chain transaction that filled a DLN order.

use std::time::Duration;

use alloy::primitives::TxHash;
use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, info, warn};

use crate::dln_client::DlnClient;
use crate::LicenseError;

/// Backoff budget for destination resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Retries after the first lookup.
    pub max_retries: usize,
    pub jitter: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: 20,
            jitter: true,
        }
    }
}

impl ResolverConfig {
    /// Total number of lookups, counting the first one.
    pub fn attempts(&self) -> usize {
        self.max_retries + 1
    }

    fn strategy(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);
        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

#[derive(Debug)]
enum Lookup {
    Upstream(LicenseError),
    /// Order known but not fulfilled yet.
    Pending,
    Malformed(String),
}

/// Poll the DLN stats API until the order created by `source_tx_hash` reports
/// its destination transaction.
///
/// Lookup failures and unfulfilled orders are retried with exponential backoff.
/// Returns [`LicenseError::ResolutionTimeout`] once the budget is spent, or
/// [`LicenseError::UpstreamError`] if the aggregator reports a hash that is not
/// a valid transaction hash.
pub async fn resolve_destination_tx(
    client: &DlnClient,
    source_tx_hash: TxHash,
    config: &ResolverConfig,
) -> Result<TxHash, LicenseError> {
    let lookup = || async {
        let status = client
            .order_status(source_tx_hash)
            .await
            .map_err(Lookup::Upstream)?;
        let raw = status.destination_tx_hash().ok_or(Lookup::Pending)?;
        raw.parse::<TxHash>()
            .map_err(|e| Lookup::Malformed(format!("invalid destination hash '{raw}': {e}")))
    };

    let result = lookup
        .retry(config.strategy())
        .when(|e| !matches!(e, Lookup::Malformed(_)))
        .notify(|err, dur| match err {
            Lookup::Pending => debug!(%source_tx_hash, ?dur, "order not fulfilled yet, retrying"),
            Lookup::Upstream(e) => {
                debug!(%source_tx_hash, error = %e, ?dur, "order lookup failed, retrying")
            }
            Lookup::Malformed(_) => {}
        })
        .await;

    match result {
        Ok(destination) => {
            info!(source = %source_tx_hash, destination = %destination, "destination transaction resolved");
            Ok(destination)
        }
        Err(Lookup::Malformed(msg)) => Err(LicenseError::UpstreamError(msg)),
        Err(last) => {
            warn!(
                %source_tx_hash,
                attempts = config.attempts(),
                last_error = ?last,
                "destination transaction not found"
            );
            Err(LicenseError::ResolutionTimeout {
                attempts: config.attempts(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dln_client::tests::test_config;
    use alloy::primitives::b256;
    use httpmock::prelude::*;
    use serde_json::json;

    const SOURCE: TxHash =
        b256!("8532e9c0b8b5e3b7f0c1a2d3e4f5061728394a5b6c7d8e9f0a1b2c3d4e5f6071");
    const DESTINATION: TxHash =
        b256!("5a4106c1f00ec7ec0d0f1f0bcd2fbd2f0b0e8f3d4c9c7e2a1f0e5d6c7b8a9f01");

    fn fast_config() -> ResolverConfig {
        ResolverConfig {
            min_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            max_retries: 3,
            jitter: false,
        }
    }

    #[tokio::test]
    async fn test_resolves_on_first_lookup() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/v1.0/Orders/creationTxHash/{SOURCE}"));
            then.status(200).json_body_obj(&json!({
                "fulfilledDstEventMetadata": {
                    "transactionHash": { "stringValue": DESTINATION.to_string() }
                }
            }));
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let destination = resolve_destination_tx(&client, SOURCE, &fast_config())
            .await
            .unwrap();

        assert_eq!(destination, DESTINATION);
        assert_eq!(mock.hits(), 1);
    }

    #[tokio::test]
    async fn test_unfulfilled_order_times_out() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("/v1.0/Orders/creationTxHash/{SOURCE}"));
            then.status(200)
                .json_body_obj(&json!({ "fulfilledDstEventMetadata": null }));
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let err = resolve_destination_tx(&client, SOURCE, &fast_config())
            .await
            .unwrap_err();

        assert!(matches!(err, LicenseError::ResolutionTimeout { attempts: 4 }));
        assert_eq!(mock.hits(), 4);
    }

    #[tokio::test]
    async fn test_unknown_order_retries_then_times_out() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path_contains("/v1.0/Orders/creationTxHash/");
            then.status(404);
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let err = resolve_destination_tx(&client, SOURCE, &fast_config())
            .await
            .unwrap_err();

        assert!(matches!(err, LicenseError::ResolutionTimeout { .. }));
        assert!(mock.hits() > 1);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path_contains("/v1.0/Orders/creationTxHash/");
            then.status(200).json_body_obj(&json!({
                "fulfilledDstEventMetadata": {
                    "transactionHash": { "stringValue": "0x5a4106" }
                }
            }));
        });

        let client = DlnClient::new(test_config(&server)).unwrap();
        let err = resolve_destination_tx(&client, SOURCE, &fast_config())
            .await
            .unwrap_err();

        assert!(matches!(err, LicenseError::UpstreamError(_)));
        assert_eq!(mock.hits(), 1);
    }
}
