use std::io::Write;

use crate::application::LedgerError;
use crate::domain::{Account, Ledger, format_amount};

/// Write the three-line statement for one account.
///
/// ```text
/// First Name: Huize
/// Last Name: Huang
/// Balance: 34.57
/// ```
pub fn write_statement<W: Write>(account: &Account, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "First Name: {}", account.first_name)?;
    writeln!(writer, "Last Name: {}", account.last_name)?;
    writeln!(writer, "Balance: {}", format_amount(account.balance))?;
    Ok(())
}

/// Export every account's balance as CSV, in ledger order.
pub fn export_balances_csv<W: Write>(ledger: &Ledger, writer: W) -> Result<usize, LedgerError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["account_number", "first_name", "last_name", "balance"])?;

    let mut count = 0;
    for account in ledger.values() {
        write_account_row(&mut csv_writer, account)?;
        count += 1;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(count)
}

/// Export an already ordered list of accounts as CSV.
pub fn export_accounts_csv<W: Write>(
    accounts: &[Account],
    writer: W,
) -> Result<usize, LedgerError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["account_number", "first_name", "last_name", "balance"])?;
    for account in accounts {
        write_account_row(&mut csv_writer, account)?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(accounts.len())
}

fn write_account_row<W: Write>(
    csv_writer: &mut csv::Writer<W>,
    account: &Account,
) -> Result<(), LedgerError> {
    csv_writer.write_record([
        account.id.as_str(),
        account.first_name.as_str(),
        account.last_name.as_str(),
        format_amount(account.balance).as_str(),
    ])?;
    Ok(())
}
