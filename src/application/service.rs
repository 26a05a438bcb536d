use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::{
    Account, Amount, Ledger, SALES_TAX_RATE, SortDirection, SortKey, format_amount, round_amount,
};
use crate::io::export::write_statement;

use super::LedgerError;

/// Application service providing the account operations.
///
/// The service owns no state: every call receives the caller's ledger and
/// either reads it or mutates one account in place. A failed call leaves the
/// ledger exactly as it found it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerService;

/// Breakdown of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub account: Account,
    pub subtotal: Amount,
    pub tax: Amount,
    pub total: Amount,
}

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    // ========================
    // Lookups
    // ========================

    /// Get an account by id.
    pub fn get_account<'a>(&self, ledger: &'a Ledger, id: &str) -> Option<&'a Account> {
        ledger.get(id)
    }

    /// Round an account's balance to two decimals in place.
    pub fn round_balance(&self, ledger: &mut Ledger, id: &str) -> Option<Account> {
        let account = ledger.get_mut(id)?;
        account.balance = round_amount(account.balance);
        Some(account.clone())
    }

    // ========================
    // Balance mutations
    // ========================

    /// Withdraw `amount` from an account.
    pub fn withdraw(
        &self,
        ledger: &mut Ledger,
        id: &str,
        amount: Amount,
    ) -> Result<Account, LedgerError> {
        ensure_non_negative(amount)?;
        let account = find_mut(ledger, id)?;

        if !account.can_cover(amount) {
            warn!(account = id, amount = %amount, balance = %account.balance, "withdrawal rejected");
            return Err(LedgerError::InsufficientFunds {
                account: id.to_string(),
                balance: account.balance,
                required: amount,
            });
        }

        let balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| overflow(id, amount))?;
        account.balance = round_amount(balance);
        info!(account = id, amount = %amount, balance = %account.balance, "withdrawal");
        Ok(account.clone())
    }

    /// Deposit `amount` into an account.
    pub fn deposit(
        &self,
        ledger: &mut Ledger,
        id: &str,
        amount: Amount,
    ) -> Result<Account, LedgerError> {
        let account = find_mut(ledger, id)?;
        ensure_non_negative(amount)?;

        let balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| overflow(id, amount))?;
        account.balance = round_amount(balance);
        info!(account = id, amount = %amount, balance = %account.balance, "deposit");
        Ok(account.clone())
    }

    /// Charge the sum of `amounts` plus sales tax to an account.
    pub fn purchase(
        &self,
        ledger: &mut Ledger,
        id: &str,
        amounts: &[Amount],
    ) -> Result<PurchaseReceipt, LedgerError> {
        let account = find_mut(ledger, id)?;
        for amount in amounts {
            ensure_non_negative(*amount)?;
        }

        let subtotal = amounts
            .iter()
            .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(*amount))
            .ok_or_else(|| overflow(id, Decimal::MAX))?;
        let tax = subtotal
            .checked_mul(SALES_TAX_RATE)
            .ok_or_else(|| overflow(id, subtotal))?;
        let total = subtotal
            .checked_add(tax)
            .ok_or_else(|| overflow(id, subtotal))?;

        if !account.can_cover(total) {
            warn!(account = id, cost = %total, balance = %account.balance, "purchase rejected");
            return Err(LedgerError::InsufficientFunds {
                account: id.to_string(),
                balance: account.balance,
                required: total,
            });
        }

        let balance = account
            .balance
            .checked_sub(total)
            .ok_or_else(|| overflow(id, total))?;
        account.balance = round_amount(balance);
        info!(
            account = id,
            subtotal = %subtotal,
            tax = %tax,
            balance = %account.balance,
            "purchase"
        );

        Ok(PurchaseReceipt {
            account: account.clone(),
            subtotal,
            tax,
            total,
        })
    }

    /// Sales tax owed on `amount`.
    pub fn sales_tax(amount: Amount) -> Amount {
        amount * SALES_TAX_RATE
    }

    // ========================
    // Listings and exports
    // ========================

    /// Sort accounts by a key and direction given as text, e.g. `"balance"`, `"desc"`.
    pub fn sort_accounts(
        &self,
        ledger: &Ledger,
        sort_key: &str,
        direction: &str,
    ) -> Result<Vec<Account>, LedgerError> {
        let key = SortKey::from_str(sort_key)
            .ok_or_else(|| LedgerError::InvalidArgument(format!("sort key '{}'", sort_key)))?;
        let direction = SortDirection::from_str(direction).ok_or_else(|| {
            LedgerError::InvalidArgument(format!("sort direction '{}'", direction))
        })?;
        Ok(self.sort_accounts_by(ledger, key, direction))
    }

    /// Sort accounts by an already parsed key and direction.
    pub fn sort_accounts_by(
        &self,
        ledger: &Ledger,
        key: SortKey,
        direction: SortDirection,
    ) -> Vec<Account> {
        crate::domain::sort_accounts(ledger, key, direction)
    }

    /// Write a three-line statement for one account to `destination`.
    /// An unknown id fails before the destination is touched.
    pub fn export_statement(
        &self,
        ledger: &Ledger,
        id: &str,
        destination: &Path,
    ) -> Result<(), LedgerError> {
        let account = self
            .get_account(ledger, id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;

        let file = File::create(destination).map_err(|e| LedgerError::io(destination, e))?;
        let mut writer = BufWriter::new(file);
        write_statement(account, &mut writer).map_err(|e| LedgerError::io(destination, e))?;
        writer
            .flush()
            .map_err(|e| LedgerError::io(destination, e))?;

        info!(
            account = id,
            path = %destination.display(),
            balance = %format_amount(account.balance),
            "statement exported"
        );
        Ok(())
    }
}

fn find_mut<'a>(ledger: &'a mut Ledger, id: &str) -> Result<&'a mut Account, LedgerError> {
    ledger.get_mut(id).ok_or_else(|| {
        warn!(account = id, "unknown account");
        LedgerError::AccountNotFound(id.to_string())
    })
}

fn overflow(id: &str, amount: Amount) -> LedgerError {
    warn!(account = id, amount = %amount, "amount out of range");
    LedgerError::InvalidAmount(format!("{} is out of range for account {}", amount, id))
}

fn ensure_non_negative(amount: Amount) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "{} must not be negative",
            amount
        )));
    }
    Ok(())
}
