use std::cmp::Ordering;

use super::{Account, Ledger};

/// Field an account listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    AccountNumber,
    FirstName,
    LastName,
    Balance,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::AccountNumber => "account_number",
            SortKey::FirstName => "first_name",
            SortKey::LastName => "last_name",
            SortKey::Balance => "balance",
        }
    }

    /// Accepts both `firstName` and `first_name` spellings, in any case.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "accountnumber" => Some(SortKey::AccountNumber),
            "firstname" => Some(SortKey::FirstName),
            "lastname" => Some(SortKey::LastName),
            "balance" => Some(SortKey::Balance),
            _ => None,
        }
    }

    fn compare(&self, a: &Account, b: &Account) -> Ordering {
        match self {
            SortKey::AccountNumber => a.id.cmp(&b.id),
            SortKey::FirstName => a.first_name.cmp(&b.first_name),
            SortKey::LastName => a.last_name.cmp(&b.last_name),
            SortKey::Balance => a.balance.cmp(&b.balance),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort a snapshot of the ledger by one field.
///
/// The sort is stable in both directions: `Desc` flips the comparison rather
/// than reversing the output, so accounts with equal keys stay in ledger
/// (ascending id) order.
pub fn sort_accounts(ledger: &Ledger, key: SortKey, direction: SortDirection) -> Vec<Account> {
    let mut accounts: Vec<Account> = ledger.values().cloned().collect();
    match direction {
        SortDirection::Asc => accounts.sort_by(|a, b| key.compare(a, b)),
        SortDirection::Desc => accounts.sort_by(|a, b| key.compare(b, a)),
    }
    accounts
}
