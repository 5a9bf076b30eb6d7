//! Monthly income/expense series for the account activity chart.

use std::collections::BTreeMap;

use api_types::transaction::{Transaction, TransactionType};
use serde::Serialize;

use crate::{MoneyCents, YearMonth, aggregate::amount_of};

/// How many months the activity chart shows.
pub const SERIES_WINDOW: usize = 6;

/// Parallel vectors, one entry per month, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlySeries {
    pub months: Vec<YearMonth>,
    pub income: Vec<MoneyCents>,
    pub expense: Vec<MoneyCents>,
}

impl MonthlySeries {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// `YYYY-MM` labels.
    pub fn labels(&self) -> Vec<String> {
        self.months.iter().map(|month| month.label()).collect()
    }

    pub fn display_labels(&self) -> Vec<String> {
        self.months.iter().map(|month| month.display_label()).collect()
    }
}

/// Groups every dated transaction by calendar month and keeps the latest
/// [`SERIES_WINDOW`] months that actually occur in the data.
///
/// Any transaction opens its month; only deposits feed `income` and only
/// withdrawals feed `expense`.
pub fn monthly_series(transactions: &[Transaction]) -> MonthlySeries {
    let mut buckets: BTreeMap<YearMonth, (MoneyCents, MoneyCents)> = BTreeMap::new();

    for tx in transactions {
        let Some(date) = tx.transaction_date else {
            continue;
        };
        let bucket = buckets.entry(YearMonth::of(date)).or_default();
        match tx.transaction_type {
            TransactionType::Deposit => bucket.0 += amount_of(tx),
            TransactionType::Withdrawal => bucket.1 += amount_of(tx),
            TransactionType::Transfer | TransactionType::Unknown => {}
        }
    }

    let skip = buckets.len().saturating_sub(SERIES_WINDOW);
    let mut series = MonthlySeries::default();
    for (month, (income, expense)) in buckets.into_iter().skip(skip) {
        series.months.push(month);
        series.income.push(income);
        series.expense.push(expense);
    }
    series
}
