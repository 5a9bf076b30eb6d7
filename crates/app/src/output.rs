use api_types::{
    account::{Account, AccountType},
    transaction::Transaction,
};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use engine::MoneyCents;

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.iter().map(|h| Cell::new(*h)));
    for row in rows {
        table.add_row(row.into_iter().map(Cell::new));
    }
    table
}

pub fn money(amount: Option<f64>) -> String {
    MoneyCents::from_amount(amount).to_string()
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn date(value: Option<chrono::NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn accounts_table(accounts: &[Account]) -> Table {
    let rows = accounts
        .iter()
        .map(|account| {
            vec![
                account.id.to_string(),
                capitalize(account.account_type.as_str()),
                money(account.balance),
                capitalize(account.status.as_str()),
                date(account.open_date),
                date(account.close_date),
            ]
        })
        .collect();
    pretty_table(&["ID", "Type", "Balance", "Status", "Opened", "Closed"], rows)
}

pub fn account_types_table(by_type: &[(AccountType, MoneyCents)]) -> Table {
    let rows = by_type
        .iter()
        .map(|(kind, total)| vec![capitalize(kind.as_str()), total.to_string()])
        .collect();
    pretty_table(&["Type", "Balance"], rows)
}

/// Transactions with the balance attributed to each row.
pub fn transactions_table(transactions: &[Transaction], balances: &[MoneyCents]) -> Table {
    let rows = transactions
        .iter()
        .zip(balances)
        .map(|(tx, balance)| {
            vec![
                tx.id.to_string(),
                date(tx.transaction_date),
                capitalize(tx.transaction_type.as_str()),
                money(tx.amount),
                engine::aggregate::category_name(tx).to_string(),
                tx.description.clone().unwrap_or_default(),
                balance.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["ID", "Date", "Type", "Amount", "Category", "Description", "Balance"],
        rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("withdrawal"), "Withdrawal");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn account_types_table_lists_each_type() {
        let table = account_types_table(&[
            (AccountType::Checking, MoneyCents::new(1000_25)),
            (AccountType::Savings, MoneyCents::ZERO),
        ]);
        let text = table.to_string();
        assert!(text.contains("Checking"));
        assert!(text.contains("1000.25€"));
        assert!(text.contains("Savings"));
        assert!(text.contains("0.00€"));
    }

    #[test]
    fn money_never_shows_nan() {
        assert_eq!(money(Some(f64::NAN)), "0.00€");
        assert_eq!(money(Some(3.5)), "3.50€");
    }
}
