use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::application::LedgerError;
use crate::domain::{Account, Amount, Ledger, parse_amount, round_amount};

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPaths {
    pub accounts: PathBuf,
    pub deposits: PathBuf,
    pub withdrawals: PathBuf,
}

impl Default for LedgerPaths {
    fn default() -> Self {
        Self {
            accounts: PathBuf::from("accounts.txt"),
            deposits: PathBuf::from("deposits.csv"),
            withdrawals: PathBuf::from("withdrawals.csv"),
        }
    }
}

impl LedgerPaths {
    pub fn new(
        accounts: impl Into<PathBuf>,
        deposits: impl Into<PathBuf>,
        withdrawals: impl Into<PathBuf>,
    ) -> Self {
        Self {
            accounts: accounts.into(),
            deposits: deposits.into(),
            withdrawals: withdrawals.into(),
        }
    }
}

/// Direction a transactions file moves money in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    Deposit,
    Withdrawal,
}

impl Movement {
    fn source_name(&self) -> &'static str {
        match self {
            Movement::Deposit => "deposits",
            Movement::Withdrawal => "withdrawals",
        }
    }

    /// `None` when the new balance would overflow.
    fn apply(&self, balance: Amount, amount: Amount) -> Option<Amount> {
        match self {
            Movement::Deposit => balance.checked_add(amount),
            Movement::Withdrawal => balance.checked_sub(amount),
        }
    }
}

/// Builds the initial ledger from an accounts list and its transaction files.
///
/// Accounts are `id|first|last` rows. Deposits and withdrawals are
/// `id,amount[,amount...]` rows that are summed into the matching account;
/// rows for ids that are not in the accounts list are skipped. Any malformed
/// row aborts the whole load.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountLoader;

impl AccountLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load the ledger from the files named in `paths`.
    pub fn load_files(&self, paths: &LedgerPaths) -> Result<Ledger, LedgerError> {
        let accounts = open(&paths.accounts)?;
        let deposits = open(&paths.deposits)?;
        let withdrawals = open(&paths.withdrawals)?;
        self.load(accounts, deposits, withdrawals)
    }

    /// Load the ledger from three readers.
    pub fn load<A: Read, D: Read, W: Read>(
        &self,
        accounts: A,
        deposits: D,
        withdrawals: W,
    ) -> Result<Ledger, LedgerError> {
        let mut ledger = read_accounts(accounts)?;
        apply_movements(&mut ledger, deposits, Movement::Deposit)?;
        apply_movements(&mut ledger, withdrawals, Movement::Withdrawal)?;

        for account in ledger.values_mut() {
            account.balance = round_amount(account.balance);
        }

        debug!(accounts = ledger.len(), "ledger loaded");
        Ok(ledger)
    }
}

fn open(path: &Path) -> Result<BufReader<File>, LedgerError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| LedgerError::io(path, e))
}

fn reader<R: Read>(source: R, delimiter: u8) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source)
}

/// A whitespace-only line comes back as a single empty field.
fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

fn record_line(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback)
}

fn parse_error(source_name: &str, line: usize, message: impl Into<String>) -> LedgerError {
    LedgerError::Parse {
        source_name: source_name.to_string(),
        line,
        message: message.into(),
    }
}

fn read_error(source_name: &str, index: usize, err: csv::Error) -> LedgerError {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(index + 1);
    parse_error(source_name, line, err.to_string())
}

fn read_accounts<R: Read>(source: R) -> Result<Ledger, LedgerError> {
    const SOURCE: &str = "accounts";
    let mut ledger = Ledger::new();

    for (index, result) in reader(source, b'|').records().enumerate() {
        let record = result.map_err(|e| read_error(SOURCE, index, e))?;
        if is_blank(&record) {
            continue;
        }

        let line = record_line(&record, index + 1);
        if record.len() != 3 {
            return Err(parse_error(
                SOURCE,
                line,
                format!("expected 3 fields (id|first|last), found {}", record.len()),
            ));
        }

        let id = &record[0];
        if id.is_empty() {
            return Err(parse_error(SOURCE, line, "empty account id"));
        }

        let account = Account::new(id, &record[1], &record[2]);
        if ledger.insert(account.id.clone(), account).is_some() {
            warn!(account = id, line, "duplicate account replaces earlier record");
        }
    }

    debug!(accounts = ledger.len(), "accounts read");
    Ok(ledger)
}

fn apply_movements<R: Read>(
    ledger: &mut Ledger,
    source: R,
    movement: Movement,
) -> Result<(), LedgerError> {
    let source_name = movement.source_name();
    let mut applied = 0usize;

    for (index, result) in reader(source, b',').records().enumerate() {
        let record = result.map_err(|e| read_error(source_name, index, e))?;
        if is_blank(&record) {
            continue;
        }

        let line = record_line(&record, index + 1);
        let id = &record[0];

        // Amounts are validated even for unknown ids.
        let amounts = record
            .iter()
            .skip(1)
            .map(|field| {
                parse_amount(field).map_err(|e| parse_error(source_name, line, e.to_string()))
            })
            .collect::<Result<Vec<Amount>, _>>()?;

        let Some(account) = ledger.get_mut(id) else {
            warn!(account = id, line, source = source_name, "skipping unknown account");
            continue;
        };

        let mut balance = account.balance;
        for amount in &amounts {
            balance = movement.apply(balance, *amount).ok_or_else(|| {
                parse_error(
                    source_name,
                    line,
                    format!("amount {} overflows the balance of account {}", amount, id),
                )
            })?;
        }
        account.balance = balance;
        applied += amounts.len();
    }

    debug!(source = source_name, applied, "transactions applied");
    Ok(())
}
