use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Amount;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Parse error in {source_name} line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Insufficient funds in account {account}: balance {balance:.2}, required {required:.2}")]
    InsufficientFunds {
        account: String,
        balance: Amount,
        required: Amount,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LedgerError::Io {
            path: path.into(),
            source,
        }
    }
}
