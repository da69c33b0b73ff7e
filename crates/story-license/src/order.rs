//! Builds DLN `create-tx` request URLs. Pure; no I/O.

use url::Url;

use crate::hook::DlnHook;
use crate::{LicenseConfig, LicenseError, PaymentIntent, NATIVE_TOKEN};

/// Path of the DLN order creation endpoint.
pub const CREATE_TX_PATH: &str = "/v1.0/dln/order/create-tx";

/// Why an order is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPurpose {
    /// Price quote only; the returned transaction is never sent.
    Quote,
    /// Order that will be signed and submitted.
    Submit,
}

impl OrderPurpose {
    /// Value of the `enableEstimate` query parameter.
    fn enable_estimate(self) -> bool {
        match self {
            OrderPurpose::Quote => false,
            OrderPurpose::Submit => true,
        }
    }
}

/// Build the `create-tx` URL for `intent`.
///
/// The order spends native ETH on Base (amount solved by the aggregator),
/// delivers `payment_amount` of native IP to the Story multicall and attaches
/// a hook minting the license for the intent's receiver.
pub fn build_order_url(
    config: &LicenseConfig,
    intent: &PaymentIntent,
    purpose: OrderPurpose,
) -> Result<Url, LicenseError> {
    let hook = DlnHook::mint_license(intent, config.multicall).to_json()?;

    let base = config.dln_api_url.trim_end_matches('/');
    let mut url = Url::parse(&format!("{base}{CREATE_TX_PATH}"))
        .map_err(|e| LicenseError::ConfigError(format!("invalid DLN API URL '{base}': {e}")))?;

    let sender = intent.sender_address().to_string();
    url.query_pairs_mut()
        .append_pair("srcChainId", &config.source_chain_id.to_string())
        .append_pair("srcChainTokenIn", &NATIVE_TOKEN.to_string())
        .append_pair("srcChainTokenInAmount", "auto")
        .append_pair("dstChainId", &config.dln_destination_chain_id.to_string())
        .append_pair("dstChainTokenOut", &NATIVE_TOKEN.to_string())
        .append_pair("dstChainTokenOutAmount", &intent.payment_amount().to_string())
        .append_pair("dstChainTokenOutRecipient", &config.multicall.to_string())
        .append_pair("senderAddress", &sender)
        .append_pair("srcChainOrderAuthorityAddress", &sender)
        .append_pair("dstChainOrderAuthorityAddress", &sender)
        .append_pair("enableEstimate", &purpose.enable_estimate().to_string())
        .append_pair("prependOperatingExpenses", "true")
        .append_pair("dlnHook", &hook);

    tracing::debug!(%url, ?purpose, "built DLN create-tx request");
    Ok(url)
}
