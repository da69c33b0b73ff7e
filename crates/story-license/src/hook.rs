//! DLN post-fill hook that mints the license token on Story.
//!
//! After the order is filled, deBridge calls `to` with `calldata` on the
//! destination chain. Here that is the Story multicall's
//! `mintLicenseTokensCrossChain(licensorIpId, licenseTermsId, 1, receiver)`.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::{IStoryLicenseMinter, PaymentIntent, LICENSE_TOKEN_AMOUNT};

/// Hook type understood by DLN for arbitrary EVM calls.
pub const EVM_TRANSACTION_CALL: &str = "evm_transaction_call";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCall {
    pub to: Address,
    pub calldata: Bytes,
    /// 0 lets the aggregator estimate gas for the hook.
    pub gas: u64,
}

/// JSON payload passed to `create-tx` as the `dlnHook` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlnHook {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: HookCall,
}

impl DlnHook {
    /// Hook minting one license token for `intent.receiver_address()` via `multicall`.
    pub fn mint_license(intent: &PaymentIntent, multicall: Address) -> Self {
        Self {
            kind: EVM_TRANSACTION_CALL.to_string(),
            data: HookCall {
                to: multicall,
                calldata: mint_license_calldata(intent),
                gas: 0,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, crate::LicenseError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// ABI-encoded `mintLicenseTokensCrossChain` call for `intent`.
pub fn mint_license_calldata(intent: &PaymentIntent) -> Bytes {
    IStoryLicenseMinter::mintLicenseTokensCrossChainCall {
        licensorIpId: intent.ip_asset_id(),
        licenseTermsId: intent.license_terms_id(),
        tokenAmount: U256::from(LICENSE_TOKEN_AMOUNT),
        receiver: intent.receiver_address(),
    }
    .abi_encode()
    .into()
}
