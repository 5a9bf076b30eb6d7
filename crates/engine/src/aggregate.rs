//! Period totals and per-category breakdowns for the dashboard.

use std::collections::HashMap;

use api_types::transaction::{Transaction, TransactionType};
use chrono::NaiveDate;
use serde::Serialize;

use crate::{MoneyCents, PeriodFilter, YearMonth};

/// Bucket name for transactions without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Amount of a record in cents; missing or broken amounts count as zero.
pub fn amount_of(tx: &Transaction) -> MoneyCents {
    MoneyCents::from_amount(tx.amount)
}

/// Display name of the category of a record.
pub fn category_name(tx: &Transaction) -> &str {
    tx.category
        .as_ref()
        .map(|category| category.name.as_str())
        .unwrap_or(UNCATEGORIZED)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub amount: MoneyCents,
}

/// Sums `kind` amounts per category name.
///
/// Sorted by amount, largest first. Equal amounts keep the order in which
/// their category first appears in `transactions`.
pub fn category_breakdown<'a, I>(transactions: I, kind: TransactionType) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tx in transactions {
        if tx.transaction_type != kind {
            continue;
        }
        let name = category_name(tx);
        let amount = amount_of(tx);
        match index.get(name) {
            Some(&pos) => totals[pos].amount += amount,
            None => {
                index.insert(name, totals.len());
                totals.push(CategoryTotal {
                    name: name.to_string(),
                    amount,
                });
            }
        }
    }

    // `sort_by` is stable.
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

/// Totals of one effective period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub period: YearMonth,
    pub total_spending: MoneyCents,
    pub total_deposit: MoneyCents,
    pub total_transfer: MoneyCents,
    deposits: Vec<CategoryTotal>,
    withdrawals: Vec<CategoryTotal>,
    transfers: Vec<CategoryTotal>,
}

impl Aggregate {
    pub fn total(&self, kind: TransactionType) -> MoneyCents {
        match kind {
            TransactionType::Deposit => self.total_deposit,
            TransactionType::Withdrawal => self.total_spending,
            TransactionType::Transfer => self.total_transfer,
            TransactionType::Unknown => MoneyCents::ZERO,
        }
    }

    /// Deposits minus withdrawals. Transfers are not counted.
    pub fn net_savings(&self) -> MoneyCents {
        self.total_deposit - self.total_spending
    }

    pub fn category_breakdown(&self, kind: TransactionType) -> &[CategoryTotal] {
        match kind {
            TransactionType::Deposit => &self.deposits,
            TransactionType::Withdrawal => &self.withdrawals,
            TransactionType::Transfer => &self.transfers,
            TransactionType::Unknown => &[],
        }
    }

    pub fn top_categories(&self, kind: TransactionType, n: usize) -> &[CategoryTotal] {
        let breakdown = self.category_breakdown(kind);
        &breakdown[..n.min(breakdown.len())]
    }

    /// Percentage of `entry` in the total of `kind`; 0 when the total is 0.
    pub fn share_percent(&self, kind: TransactionType, entry: &CategoryTotal) -> f64 {
        entry.amount.percent_of(self.total(kind))
    }
}

/// Aggregates the transactions dated in the effective period of `filter`.
///
/// `today` resolves "all" selections. Undated records are skipped.
pub fn aggregate(transactions: &[Transaction], filter: &PeriodFilter, today: NaiveDate) -> Aggregate {
    let period = filter.effective(today);
    let in_period: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.transaction_date.is_some_and(|date| period.contains(date)))
        .collect();

    let total_of = |kind: TransactionType| -> MoneyCents {
        in_period
            .iter()
            .filter(|tx| tx.transaction_type == kind)
            .map(|tx| amount_of(tx))
            .sum()
    };

    Aggregate {
        period,
        total_spending: total_of(TransactionType::Withdrawal),
        total_deposit: total_of(TransactionType::Deposit),
        total_transfer: total_of(TransactionType::Transfer),
        deposits: category_breakdown(in_period.iter().copied(), TransactionType::Deposit),
        withdrawals: category_breakdown(in_period.iter().copied(), TransactionType::Withdrawal),
        transfers: category_breakdown(in_period.iter().copied(), TransactionType::Transfer),
    }
}

#[cfg(test)]
mod tests {
    use api_types::category::Category;

    use super::*;
    use crate::{Selection, test_support::tx};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn food_and_salary_example() {
        let txs = vec![
            tx(TransactionType::Withdrawal, Some(40.0), Some("Food"), "2024-05-01"),
            tx(TransactionType::Withdrawal, Some(10.0), Some("Food"), "2024-05-02"),
            tx(TransactionType::Deposit, Some(100.0), Some("Salary"), "2024-05-03"),
        ];
        let agg = aggregate(&txs, &PeriodFilter::default(), today());

        assert_eq!(agg.total_spending, MoneyCents::new(5000));
        assert_eq!(agg.total_deposit, MoneyCents::new(10000));
        assert_eq!(agg.net_savings(), MoneyCents::new(5000));
        assert_eq!(
            agg.category_breakdown(TransactionType::Withdrawal),
            &[CategoryTotal {
                name: "Food".to_string(),
                amount: MoneyCents::new(5000)
            }]
        );
    }

    #[test]
    fn filters_by_effective_period() {
        let txs = vec![
            tx(TransactionType::Withdrawal, Some(10.0), None, "2024-05-01"),
            tx(TransactionType::Withdrawal, Some(20.0), None, "2024-04-30"),
            tx(TransactionType::Withdrawal, Some(40.0), None, "2023-05-01"),
            tx(TransactionType::Withdrawal, Some(80.0), None, ""),
        ];

        let agg = aggregate(&txs, &PeriodFilter::default(), today());
        assert_eq!(agg.total_spending, MoneyCents::new(1000));

        let april = PeriodFilter::new(Selection::Only(2024), Selection::Only(4)).unwrap();
        assert_eq!(aggregate(&txs, &april, today()).total_spending, MoneyCents::new(2000));

        let may_2023 = PeriodFilter::new(Selection::Only(2023), Selection::All).unwrap();
        assert_eq!(aggregate(&txs, &may_2023, today()).total_spending, MoneyCents::new(4000));
    }

    #[test]
    fn breakdown_is_sorted_and_stable() {
        let txs = vec![
            tx(TransactionType::Withdrawal, Some(5.0), Some("Books"), "2024-05-01"),
            tx(TransactionType::Withdrawal, Some(30.0), Some("Rent"), "2024-05-01"),
            tx(TransactionType::Withdrawal, Some(5.0), Some("Games"), "2024-05-01"),
            tx(TransactionType::Withdrawal, Some(5.0), None, "2024-05-01"),
        ];
        let names: Vec<String> = category_breakdown(&txs, TransactionType::Withdrawal)
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, ["Rent", "Books", "Games", UNCATEGORIZED]);
    }

    #[test]
    fn breakdown_sums_to_total() {
        let categories = ["A", "B", "C"];
        let txs: Vec<Transaction> = (0..50)
            .map(|i| {
                tx(
                    if i % 3 == 0 {
                        TransactionType::Deposit
                    } else {
                        TransactionType::Withdrawal
                    },
                    Some(0.1 * f64::from(i) + 0.07),
                    Some(categories[i as usize % 3]),
                    "2024-05-10",
                )
            })
            .collect();
        let agg = aggregate(&txs, &PeriodFilter::default(), today());
        for kind in [TransactionType::Deposit, TransactionType::Withdrawal] {
            let sum: MoneyCents = agg.category_breakdown(kind).iter().map(|c| c.amount).sum();
            assert_eq!(sum, agg.total(kind));
        }
    }

    #[test]
    fn missing_amounts_count_as_zero() {
        let txs = vec![
            tx(TransactionType::Deposit, None, Some("Gift"), "2024-05-01"),
            tx(TransactionType::Deposit, Some(f64::NAN), Some("Gift"), "2024-05-01"),
            tx(TransactionType::Deposit, Some(12.0), Some("Gift"), "2024-05-01"),
        ];
        let agg = aggregate(&txs, &PeriodFilter::default(), today());
        assert_eq!(agg.total_deposit, MoneyCents::new(1200));
        assert_eq!(agg.top_categories(TransactionType::Deposit, 5).len(), 1);
    }

    #[test]
    fn top_categories_and_shares() {
        let mut txs = vec![
            tx(TransactionType::Withdrawal, Some(75.0), Some("Rent"), "2024-05-01"),
            tx(TransactionType::Withdrawal, Some(25.0), Some("Food"), "2024-05-01"),
        ];
        txs[1].category = Some(Category {
            id: 9,
            name: "Groceries".to_string(),
        });
        let agg = aggregate(&txs, &PeriodFilter::default(), today());

        let top = agg.top_categories(TransactionType::Withdrawal, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Rent");
        assert_eq!(agg.share_percent(TransactionType::Withdrawal, &top[0]), 75.0);

        let groceries = &agg.category_breakdown(TransactionType::Withdrawal)[1];
        assert_eq!(groceries.name, "Groceries");
        assert_eq!(agg.share_percent(TransactionType::Deposit, groceries), 0.0);
        assert!(agg.top_categories(TransactionType::Deposit, 3).is_empty());
    }
}
