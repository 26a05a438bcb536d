use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{Account, Amount, Ledger, format_amount, parse_amount};
use crate::io::{
    AccountLoader, LedgerPaths, export_accounts_csv, export_balances_csv, write_statement,
};

/// Bankbook - flat-file bank account ledger
#[derive(Parser)]
#[command(name = "bankbook")]
#[command(about = "Load bank accounts from flat files and apply deposits, withdrawals and purchases")]
#[command(version)]
pub struct Cli {
    /// Accounts file (id|first|last per line)
    #[arg(long, env = "BANKBOOK_ACCOUNTS", default_value = "accounts.txt")]
    pub accounts: PathBuf,

    /// Deposits file (id,amount[,amount...] per line)
    #[arg(long, env = "BANKBOOK_DEPOSITS", default_value = "deposits.csv")]
    pub deposits: PathBuf,

    /// Withdrawals file (id,amount[,amount...] per line)
    #[arg(long, env = "BANKBOOK_WITHDRAWALS", default_value = "withdrawals.csv")]
    pub withdrawals: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a single account
    Show {
        /// Account number
        id: String,
    },

    /// Deposit an amount into an account
    Deposit {
        /// Account number
        id: String,

        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,
    },

    /// Withdraw an amount from an account
    Withdraw {
        /// Account number
        id: String,

        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,
    },

    /// Make a purchase; sales tax is added to the item total
    Purchase {
        /// Account number
        id: String,

        /// Item amounts
        #[arg(required = true, num_args = 1..)]
        amounts: Vec<String>,
    },

    /// Show the sales tax owed on an amount
    Tax {
        /// Amount before tax
        amount: String,
    },

    /// List accounts in sorted order
    Sort {
        /// Sort key: account_number, first_name, last_name, balance
        #[arg(long, default_value = "account_number")]
        by: String,

        /// Sort direction: asc, desc
        #[arg(short, long, default_value = "asc")]
        direction: String,

        /// Output format: table, json, csv
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Export an account statement
    Statement {
        /// Account number
        id: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all balances as CSV
    Balances {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn paths(&self) -> LedgerPaths {
        LedgerPaths::new(&self.accounts, &self.deposits, &self.withdrawals)
    }

    pub fn run(self) -> Result<()> {
        let paths = self.paths();
        let mut ledger = AccountLoader::new()
            .load_files(&paths)
            .context("Failed to load accounts")?;
        let service = LedgerService::new();

        match self.command {
            Commands::Show { id } => {
                let account = service
                    .get_account(&ledger, &id)
                    .with_context(|| format!("Account does not exist: {}", id))?;
                println!("{}", account);
            }

            Commands::Deposit { id, amount } => {
                let amount = parse_cli_amount(&amount)?;
                let account = service.deposit(&mut ledger, &id, amount)?;
                println!("New balance: {}", format_amount(account.balance));
            }

            Commands::Withdraw { id, amount } => {
                let amount = parse_cli_amount(&amount)?;
                let account = service.withdraw(&mut ledger, &id, amount)?;
                println!("New balance: {}", format_amount(account.balance));
            }

            Commands::Purchase { id, amounts } => {
                let amounts = amounts
                    .iter()
                    .map(|a| parse_cli_amount(a))
                    .collect::<Result<Vec<_>>>()?;
                let receipt = service.purchase(&mut ledger, &id, &amounts)?;
                println!("Subtotal: {}", format_amount(receipt.subtotal));
                println!("Sales tax: {}", format_amount(receipt.tax));
                println!("Total: {}", format_amount(receipt.total));
                println!("New balance: {}", format_amount(receipt.account.balance));
            }

            Commands::Tax { amount } => {
                let amount = parse_cli_amount(&amount)?;
                println!("{}", format_amount(LedgerService::sales_tax(amount)));
            }

            Commands::Sort {
                by,
                direction,
                format,
            } => {
                run_sort_command(&service, &ledger, &by, &direction, &format)?;
            }

            Commands::Statement { id, output } => match output {
                Some(path) => {
                    service.export_statement(&ledger, &id, &path)?;
                    println!("Statement for {} written to {}", id, path.display());
                }
                None => {
                    let account = service
                        .get_account(&ledger, &id)
                        .with_context(|| format!("Account does not exist: {}", id))?;
                    write_statement(account, io::stdout().lock())?;
                }
            },

            Commands::Balances { output } => {
                let count = with_output(output.as_deref(), |w| {
                    Ok(export_balances_csv(&ledger, w)?)
                })?;
                if let Some(path) = output {
                    println!("Exported {} balance(s) to {}", count, path.display());
                }
            }
        }

        Ok(())
    }
}

fn parse_cli_amount(input: &str) -> Result<Amount> {
    parse_amount(input).with_context(|| format!("Invalid amount '{}'. Use '50.00' or '50'", input))
}

fn run_sort_command(
    service: &LedgerService,
    ledger: &Ledger,
    by: &str,
    direction: &str,
    format: &str,
) -> Result<()> {
    let accounts = service.sort_accounts(ledger, by, direction)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&accounts)?);
        }
        "csv" => {
            export_accounts_csv(&accounts, io::stdout().lock())?;
        }
        "table" => print_table(&accounts),
        other => anyhow::bail!("Unknown format '{}'. Use table, json or csv", other),
    }

    Ok(())
}

fn print_table(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts found.");
        return;
    }

    println!(
        "{:<10} {:<20} {:<20} {:>12}",
        "ACCOUNT", "FIRST NAME", "LAST NAME", "BALANCE"
    );
    println!("{}", "-".repeat(65));
    for account in accounts {
        println!(
            "{:<10} {:<20} {:<20} {:>12}",
            truncate(&account.id, 10),
            truncate(&account.first_name, 20),
            truncate(&account.last_name, 20),
            format_amount(account.balance)
        );
    }
}

/// Run `write` against the given file, or stdout when no path is given.
fn with_output<T>(
    path: Option<&Path>,
    write: impl FnOnce(&mut dyn Write) -> Result<T>,
) -> Result<T> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let value = write(&mut writer)?;
            writer.flush()?;
            Ok(value)
        }
        None => {
            let mut stdout = io::stdout().lock();
            write(&mut stdout)
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
