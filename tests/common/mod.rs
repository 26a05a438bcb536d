// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::fs;

use anyhow::Result;
use bankbook::{AccountLoader, Ledger, LedgerPaths};
use tempfile::TempDir;

/// Accounts used across the integration tests.
pub const ACCOUNTS: &str = "\
1|Brandon|Krakowsky
2|Chenyun|Wei
3|Dingyi|Shen
4|Huize|Huang
5|Karishma|Jain
";

pub const DEPOSITS: &str = "\
1,234.5,6352.89,1,97.60
2, 42.43, 423.21

3
4, 124.24, 1
5,6700.19
9,1000
";

pub const WITHDRAWALS: &str = "\
1,56.3,72.1
2,20.34
4,90.67
";

/// Write the three input files into a temporary directory.
pub fn write_inputs(
    accounts: &str,
    deposits: &str,
    withdrawals: &str,
) -> Result<(LedgerPaths, TempDir)> {
    let temp_dir = TempDir::new()?;
    let paths = LedgerPaths::new(
        temp_dir.path().join("accounts.txt"),
        temp_dir.path().join("deposits.csv"),
        temp_dir.path().join("withdrawals.csv"),
    );
    fs::write(&paths.accounts, accounts)?;
    fs::write(&paths.deposits, deposits)?;
    fs::write(&paths.withdrawals, withdrawals)?;
    Ok((paths, temp_dir))
}

/// Load the standard fixture ledger from disk.
pub fn standard_ledger() -> Result<(Ledger, TempDir)> {
    let (paths, temp_dir) = write_inputs(ACCOUNTS, DEPOSITS, WITHDRAWALS)?;
    let ledger = AccountLoader::new().load_files(&paths)?;
    Ok((ledger, temp_dir))
}
