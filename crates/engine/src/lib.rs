//! Dashboard analytics over transactions fetched from the banking API.
//!
//! Everything here is pure: functions take records already loaded by the
//! client and never fail on malformed data. Money is handled as
//! [`MoneyCents`] so totals are exact.

pub use aggregate::{Aggregate, CategoryTotal, UNCATEGORIZED, aggregate, category_breakdown};
pub use balance::{running_balances, signed_delta};
pub use error::EngineError;
pub use money::MoneyCents;
pub use period::{PeriodFilter, Selection, YearMonth};
pub use series::{MonthlySeries, SERIES_WINDOW, monthly_series};
pub use summary::{AccountSummary, account_summary};
pub use transfer::TransferDraft;

pub mod aggregate;
mod balance;
mod error;
mod money;
mod period;
mod series;
mod summary;
mod transfer;

pub type ResultEngine<T> = Result<T, EngineError>;

#[cfg(test)]
pub(crate) mod test_support {
    use api_types::{
        category::Category,
        transaction::{Transaction, TransactionType},
    };
    use chrono::NaiveDate;

    /// Builds a record; an empty `date` leaves it undated.
    pub fn tx(
        kind: TransactionType,
        amount: Option<f64>,
        category: Option<&str>,
        date: &str,
    ) -> Transaction {
        Transaction {
            id: 0,
            account_id: 1,
            category: category.map(|name| Category {
                id: 0,
                name: name.to_string(),
            }),
            transaction_type: kind,
            amount,
            transaction_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            description: None,
        }
    }
}
