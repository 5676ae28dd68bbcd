use super::account::{AccountId, Amount, Balance};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A request to move `amount` from one account to another.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct TransferRequest {
    #[serde(rename = "from")]
    pub from_account_id: AccountId,
    #[serde(rename = "to")]
    pub to_account_id: AccountId,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(
        from_account_id: impl Into<AccountId>,
        to_account_id: impl Into<AccountId>,
        amount: Decimal,
    ) -> Self {
        Self {
            from_account_id: from_account_id.into(),
            to_account_id: to_account_id.into(),
            amount,
        }
    }
}

/// Outcome of a committed transfer.
///
/// `resulting_balance` is the source account's balance immediately after the debit.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct TransferResult {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Amount,
    pub resulting_balance: Balance,
}

/// How many fractional digits a transfer amount may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionPolicy {
    /// Only integral amounts are accepted.
    WholeUnits,
    /// Amounts may carry at most this many significant fractional digits.
    MaxScale(u32),
    /// Any positive decimal is accepted.
    Unrestricted,
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        PrecisionPolicy::MaxScale(4)
    }
}

impl PrecisionPolicy {
    /// Validates a raw amount, rejecting non-positive values and values with
    /// more fractional digits than the policy allows. Trailing zeros do not count.
    pub fn validate(&self, raw: Decimal) -> Result<Amount> {
        let amount = Amount::new(raw)?;
        let scale = raw.normalize().scale();
        match *self {
            PrecisionPolicy::WholeUnits if scale > 0 => Err(LedgerError::InvalidAmount(format!(
                "{raw} is not a whole number of units"
            ))),
            PrecisionPolicy::MaxScale(max) if scale > max => Err(LedgerError::InvalidAmount(
                format!("{raw} has more than {max} decimal places"),
            )),
            _ => Ok(amount),
        }
    }
}

impl FromStr for PrecisionPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" => Ok(PrecisionPolicy::WholeUnits),
            "unrestricted" => Ok(PrecisionPolicy::Unrestricted),
            other => other
                .parse::<u32>()
                .map(PrecisionPolicy::MaxScale)
                .map_err(|_| {
                    LedgerError::ConfigError(format!(
                        "unknown precision policy '{s}', expected 'whole', 'unrestricted' or a number of decimal places"
                    ))
                }),
        }
    }
}

impl fmt::Display for PrecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionPolicy::WholeUnits => f.write_str("whole"),
            PrecisionPolicy::MaxScale(max) => write!(f, "{max}"),
            PrecisionPolicy::Unrestricted => f.write_str("unrestricted"),
        }
    }
}
