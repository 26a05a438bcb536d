mod common;

use std::fs;

use anyhow::Result;
use bankbook::io::export_balances_csv;
use bankbook::{LedgerError, LedgerService, round_amount};
use common::standard_ledger;
use rust_decimal_macros::dec;

#[test]
fn test_deposit_then_withdraw_same_amount() -> Result<()> {
    let (mut ledger, _temp) = standard_ledger()?;
    let service = LedgerService::new();
    let before = ledger["2"].balance;

    service.deposit(&mut ledger, "2", dec!(99.99))?;
    let account = service.withdraw(&mut ledger, "2", dec!(99.99))?;

    assert_eq!(account.balance, before);
    assert_eq!(ledger["2"].balance, before);
    Ok(())
}

#[test]
fn test_overdraw_leaves_balance_unchanged() -> Result<()> {
    let (mut ledger, _temp) = standard_ledger()?;
    let service = LedgerService::new();

    let err = service.withdraw(&mut ledger, "4", dec!(34.58)).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(ledger["4"].balance, dec!(34.57));

    // Exactly the balance is allowed.
    let account = service.withdraw(&mut ledger, "4", dec!(34.57))?;
    assert_eq!(account.balance, dec!(0.00));
    Ok(())
}

#[test]
fn test_purchase_charges_total_plus_six_percent() -> Result<()> {
    let (mut ledger, _temp) = standard_ledger()?;
    let service = LedgerService::new();
    let amounts = [dec!(19.99), dec!(5.25), dec!(100)];

    let before = ledger["1"].balance;
    let receipt = service.purchase(&mut ledger, "1", &amounts)?;

    let charged = amounts.iter().copied().sum::<rust_decimal::Decimal>() * dec!(1.06);
    assert_eq!(receipt.total, charged);
    assert_eq!(receipt.account.balance, round_amount(before - charged));
    assert_eq!(ledger["1"].balance, round_amount(before - charged));
    Ok(())
}

#[test]
fn test_purchase_beyond_balance_is_rejected() -> Result<()> {
    let (mut ledger, _temp) = standard_ledger()?;
    let service = LedgerService::new();

    // 33.00 * 1.06 = 34.98 > 34.57
    let err = service.purchase(&mut ledger, "4", &[dec!(33.00)]).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(ledger["4"].balance, dec!(34.57));
    Ok(())
}

#[test]
fn test_operations_on_unknown_account() -> Result<()> {
    let (mut ledger, _temp) = standard_ledger()?;
    let service = LedgerService::new();

    assert!(service.get_account(&ledger, "9").is_none());
    assert!(service.round_balance(&mut ledger, "9").is_none());
    assert!(matches!(
        service.deposit(&mut ledger, "9", dec!(1)),
        Err(LedgerError::AccountNotFound(_))
    ));
    assert_eq!(ledger.len(), 5);
    Ok(())
}

#[test]
fn test_sort_by_balance_desc() -> Result<()> {
    let (ledger, _temp) = standard_ledger()?;
    let sorted = LedgerService.sort_accounts(&ledger, "balance", "desc")?;

    let ids: Vec<_> = sorted.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["5", "1", "2", "4", "3"]);
    Ok(())
}

#[test]
fn test_sort_by_last_name_mixed_case_arguments() -> Result<()> {
    let (ledger, _temp) = standard_ledger()?;
    let sorted = LedgerService.sort_accounts(&ledger, "Last_Name", "ASC")?;

    let names: Vec<_> = sorted.iter().map(|a| a.last_name.as_str()).collect();
    assert_eq!(names, vec!["Huang", "Jain", "Krakowsky", "Shen", "Wei"]);
    Ok(())
}

#[test]
fn test_sort_rejects_unknown_key() -> Result<()> {
    let (ledger, _temp) = standard_ledger()?;
    let err = LedgerService
        .sort_accounts(&ledger, "middle_name", "asc")
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));
    Ok(())
}

#[test]
fn test_export_statement() -> Result<()> {
    let (ledger, temp) = standard_ledger()?;
    let destination = temp.path().join("statement.txt");

    LedgerService.export_statement(&ledger, "4", &destination)?;

    let contents = fs::read_to_string(&destination)?;
    assert_eq!(
        contents,
        "First Name: Huize\nLast Name: Huang\nBalance: 34.57\n"
    );
    Ok(())
}

#[test]
fn test_export_statement_reflects_mutations() -> Result<()> {
    let (mut ledger, temp) = standard_ledger()?;
    let destination = temp.path().join("statement.txt");

    LedgerService.deposit(&mut ledger, "3", dec!(4.14))?;
    LedgerService.export_statement(&ledger, "3", &destination)?;

    let contents = fs::read_to_string(&destination)?;
    assert_eq!(contents.lines().last(), Some("Balance: 4.14"));
    Ok(())
}

#[test]
fn test_export_statement_unknown_account_leaves_file_alone() -> Result<()> {
    let (ledger, temp) = standard_ledger()?;

    let missing = temp.path().join("missing.txt");
    let err = LedgerService
        .export_statement(&ledger, "9", &missing)
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
    assert!(!missing.exists());

    let existing = temp.path().join("existing.txt");
    fs::write(&existing, "previous statement\n")?;
    let err = LedgerService
        .export_statement(&ledger, "9", &existing)
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
    assert_eq!(fs::read_to_string(&existing)?, "previous statement\n");
    Ok(())
}

#[test]
fn test_export_balances_csv_after_mutations() -> Result<()> {
    let (mut ledger, _temp) = standard_ledger()?;
    LedgerService.withdraw(&mut ledger, "1", dec!(57.59))?;

    let mut out = Vec::new();
    let count = export_balances_csv(&ledger, &mut out)?;
    assert_eq!(count, 5);

    let csv = String::from_utf8(out)?;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("account_number,first_name,last_name,balance")
    );
    assert_eq!(lines.next(), Some("1,Brandon,Krakowsky,6500.00"));
    assert_eq!(lines.count(), 4);
    Ok(())
}
