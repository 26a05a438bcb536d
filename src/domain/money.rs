use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::fmt;

/// Money is an exact decimal; balances never go through binary floating point.
pub type Amount = Decimal;

/// Number of decimal places a balance is kept at.
pub const AMOUNT_PRECISION: u32 = 2;

/// Flat sales tax applied to purchase totals.
pub const SALES_TAX_RATE: Amount = dec!(0.06);

/// Round to two decimal places, half to even.
/// Example: 2.675 -> 2.68, 2.665 -> 2.66
pub fn round_amount(amount: Amount) -> Amount {
    amount.round_dp_with_strategy(AMOUNT_PRECISION, RoundingStrategy::MidpointNearestEven)
}

/// Format an amount with exactly two decimals.
/// Example: 125 -> "125.00", -0.5 -> "-0.50"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", round_amount(amount))
}

/// Parse a decimal string into an amount. Scientific notation is accepted.
/// Example: "50.00" -> 50.00, " 42.43" -> 42.43, "100" -> 100, "1e5" -> 100000
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    input
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "missing amount"),
            ParseAmountError::InvalidFormat(s) => write!(f, "invalid amount '{}'", s),
        }
    }
}

impl std::error::Error for ParseAmountError {}
