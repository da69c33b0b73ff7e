//! Integer-only conversions between human-readable token amounts and base units.

use alloy::primitives::U256;

use crate::LicenseError;

/// Parse a human-readable price (e.g. `"0.00001"`) into base units with `decimals`
/// decimal places. Digits beyond `decimals` are truncated. No f64 anywhere.
pub fn parse_price(price: &str, decimals: u32) -> Result<U256, LicenseError> {
    let cleaned = price.trim();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(LicenseError::ValidationError(format!(
            "invalid price '{price}': expected a decimal number"
        )));
    }

    let (integer_part, fractional_part) = cleaned.split_once('.').unwrap_or((cleaned, ""));
    if integer_part.is_empty() && fractional_part.is_empty() {
        return Err(LicenseError::ValidationError(format!(
            "invalid price '{price}': no numeric content"
        )));
    }
    if fractional_part.contains('.') {
        return Err(LicenseError::ValidationError(format!(
            "invalid price '{price}': more than one decimal point"
        )));
    }

    let parse_digits = |digits: &str, what: &str| -> Result<U256, LicenseError> {
        if digits.is_empty() {
            return Ok(U256::ZERO);
        }
        U256::from_str_radix(digits, 10).map_err(|e| {
            LicenseError::ValidationError(format!("invalid price '{price}': {what}: {e}"))
        })
    };

    let decimals_usize = decimals as usize;
    let frac_str = if fractional_part.len() > decimals_usize {
        &fractional_part[..decimals_usize]
    } else {
        fractional_part
    };

    let integer = parse_digits(integer_part, "integer part")?;
    let fractional = parse_digits(frac_str, "fractional part")?;

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    let scale = U256::from(10u64).pow(U256::from(decimals_usize - frac_str.len()));

    let overflow = || LicenseError::ValidationError(format!("invalid price '{price}': overflow"));
    let whole = integer.checked_mul(multiplier).ok_or_else(overflow)?;
    let frac = fractional.checked_mul(scale).ok_or_else(overflow)?;
    whole.checked_add(frac).ok_or_else(overflow)
}

/// Format base units as a decimal string rounded half-up to `places` digits,
/// e.g. `1234567890123456` wei with 18 decimals and 6 places is `"0.001235"`.
pub fn format_units_fixed(value: U256, decimals: u32, places: u32) -> String {
    let places = places.min(decimals);
    let drop = U256::from(10u64).pow(U256::from(decimals - places));

    let mut scaled = value / drop;
    if places < decimals && value % drop >= drop / U256::from(2u64) {
        scaled += U256::from(1u64);
    }

    let unit = U256::from(10u64).pow(U256::from(places));
    let whole = scaled / unit;
    if places == 0 {
        return whole.to_string();
    }
    let frac = (scaled % unit).to_string();
    format!("{whole}.{frac:0>width$}", width = places as usize)
}
