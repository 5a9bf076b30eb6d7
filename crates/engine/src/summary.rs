use api_types::account::{Account, AccountStatus, AccountType};
use serde::Serialize;

use crate::MoneyCents;

/// Totals for the "total amount accounts" card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub total_balance: MoneyCents,
    pub open_accounts: usize,
    pub closed_accounts: usize,
    pub by_type: Vec<(AccountType, MoneyCents)>,
}

/// Sums balances over every account, closed ones included.
///
/// Accounts whose balance could not be read count as zero.
pub fn account_summary(accounts: &[Account]) -> AccountSummary {
    let mut summary = AccountSummary::default();
    for account in accounts {
        let balance = MoneyCents::from_amount(account.balance);
        summary.total_balance += balance;
        if account.status == AccountStatus::Closed {
            summary.closed_accounts += 1;
        } else {
            summary.open_accounts += 1;
        }
        match summary
            .by_type
            .iter_mut()
            .find(|(kind, _)| *kind == account.account_type)
        {
            Some((_, total)) => *total += balance,
            None => summary.by_type.push((account.account_type, balance)),
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: i64, account_type: AccountType, balance: Option<f64>, status: AccountStatus) -> Account {
        Account {
            id,
            account_type,
            balance,
            status,
            open_date: None,
            close_date: None,
        }
    }

    #[test]
    fn sums_and_skips_unreadable_balances() {
        let accounts = [
            account(1, AccountType::Checking, Some(1200.5), AccountStatus::Active),
            account(2, AccountType::Savings, None, AccountStatus::Inactive),
            account(3, AccountType::Checking, Some(-200.25), AccountStatus::Closed),
        ];
        let summary = account_summary(&accounts);
        assert_eq!(summary.total_balance, MoneyCents::new(1000_25));
        assert_eq!(summary.open_accounts, 2);
        assert_eq!(summary.closed_accounts, 1);
        assert_eq!(
            summary.by_type,
            [
                (AccountType::Checking, MoneyCents::new(1000_25)),
                (AccountType::Savings, MoneyCents::ZERO),
            ]
        );
    }

    #[test]
    fn empty() {
        assert_eq!(account_summary(&[]), AccountSummary::default());
    }
}
