use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Amount, round_amount};

pub type AccountId = String;

/// All accounts keyed by identifier. Iteration runs in ascending id order.
pub type Ledger = BTreeMap<AccountId, Account>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub balance: Amount,
}

impl Account {
    /// A freshly opened account with a zero balance.
    pub fn new(
        id: impl Into<AccountId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            balance: Decimal::ZERO,
        }
    }

    pub fn with_balance(mut self, balance: Amount) -> Self {
        self.balance = round_amount(balance);
        self
    }

    pub fn can_cover(&self, amount: Amount) -> bool {
        amount <= self.balance
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Account Number: {}, First Name: {}, Last Name: {}, Balance: {}",
            self.id,
            self.first_name,
            self.last_name,
            super::format_amount(self.balance)
        )
    }
}
