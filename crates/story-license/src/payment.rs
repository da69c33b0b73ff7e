use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::LicenseError;

/// Everything needed to buy one license: which asset and terms, how much to
/// deliver on Story, who pays on Base and who receives the license token.
///
/// Built fresh for every purchase attempt and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    ip_asset_id: Address,
    license_terms_id: U256,
    /// Amount delivered on Story, in wei.
    payment_amount: U256,
    sender_address: Address,
    receiver_address: Address,
}

impl PaymentIntent {
    /// Build an intent from the string forms used by the UI and the aggregator.
    ///
    /// `license_terms_id` and `payment_amount` must be decimal integers.
    pub fn new(
        ip_asset_id: Address,
        license_terms_id: &str,
        payment_amount: &str,
        sender_address: Address,
        receiver_address: Address,
    ) -> Result<Self, LicenseError> {
        Ok(Self {
            ip_asset_id,
            license_terms_id: parse_decimal("license terms id", license_terms_id)?,
            payment_amount: parse_decimal("payment amount", payment_amount)?,
            sender_address,
            receiver_address,
        })
    }

    pub fn ip_asset_id(&self) -> Address {
        self.ip_asset_id
    }

    pub fn license_terms_id(&self) -> U256 {
        self.license_terms_id
    }

    pub fn payment_amount(&self) -> U256 {
        self.payment_amount
    }

    pub fn sender_address(&self) -> Address {
        self.sender_address
    }

    pub fn receiver_address(&self) -> Address {
        self.receiver_address
    }
}

fn parse_decimal(what: &str, raw: &str) -> Result<U256, LicenseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(LicenseError::ValidationError(format!(
            "invalid {what} '{raw}': expected a decimal integer"
        )));
    }
    U256::from_str_radix(trimmed, 10)
        .map_err(|e| LicenseError::ValidationError(format!("invalid {what} '{raw}': {e}")))
}

/// Parse a user-supplied address, reporting a validation error when it is
/// missing or malformed. Mixed-case input must carry a valid checksum.
pub fn parse_receiver(raw: &str) -> Result<Address, LicenseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LicenseError::ValidationError(
            "a Story address is required to receive the license".to_string(),
        ));
    }
    let is_mixed_case = trimmed.chars().any(|c| c.is_ascii_lowercase())
        && trimmed.chars().any(|c| c.is_ascii_uppercase() && c != 'X');
    let parsed = if is_mixed_case {
        Address::parse_checksummed(trimmed, None).map_err(|e| e.to_string())
    } else {
        trimmed.parse::<Address>().map_err(|e| e.to_string())
    };
    let address = parsed.map_err(|e| {
        LicenseError::ValidationError(format!("invalid Story address '{trimmed}': {e}"))
    })?;
    if address == Address::ZERO {
        return Err(LicenseError::ValidationError(
            "the zero address cannot receive a license".to_string(),
        ));
    }
    Ok(address)
}
