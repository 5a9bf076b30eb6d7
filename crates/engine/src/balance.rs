//! Balance attributed to each row of a transaction list.

use api_types::transaction::{Transaction, TransactionType};

use crate::{MoneyCents, aggregate::amount_of};

/// Effect of a transaction on the balance of its own account.
///
/// A transfer record does not say which side of the transfer the account is
/// on, so it is treated as neutral.
pub fn signed_delta(tx: &Transaction) -> MoneyCents {
    match tx.transaction_type {
        TransactionType::Deposit => amount_of(tx),
        TransactionType::Withdrawal => -amount_of(tx),
        TransactionType::Transfer | TransactionType::Unknown => MoneyCents::ZERO,
    }
}

/// Walks a newest-first list starting from the current balance.
///
/// Row `i` gets the balance right after transaction `i` was applied: the
/// first row gets `starting_balance`, and each following row gets the
/// previous value with the previous row's own delta undone.
pub fn running_balances(transactions: &[Transaction], starting_balance: MoneyCents) -> Vec<MoneyCents> {
    let mut running = starting_balance;
    transactions
        .iter()
        .map(|tx| {
            let at_row = running;
            running -= signed_delta(tx);
            at_row
        })
        .collect()
}
