//! Client-side checks run before a transfer is submitted.
//!
//! The server performs the transfer atomically and has the last word; these
//! checks only catch requests that are certain to be rejected.

use api_types::{account::Account, transaction::TransferNew};

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Debug, Clone)]
pub struct TransferDraft<'a> {
    pub from: Option<&'a Account>,
    pub to: Option<&'a Account>,
    pub amount: MoneyCents,
    pub description: Option<String>,
}

impl TransferDraft<'_> {
    /// Validates the draft and builds the request body.
    pub fn validate(self) -> ResultEngine<TransferNew> {
        let (Some(from), Some(to)) = (self.from, self.to) else {
            return Err(EngineError::InvalidTransfer(
                "both accounts are required".to_string(),
            ));
        };
        if !self.amount.is_positive() {
            return Err(EngineError::InvalidTransfer(
                "amount must be greater than zero".to_string(),
            ));
        }
        if from.id == to.id {
            return Err(EngineError::InvalidTransfer(
                "you cannot transfer to the same account".to_string(),
            ));
        }
        if self.amount > MoneyCents::from_amount(from.balance) {
            return Err(EngineError::InvalidTransfer(
                "insufficient funds for this transfer".to_string(),
            ));
        }

        let description = self
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(TransferNew {
            from_account_id: from.id,
            to_account_id: to.id,
            amount: self.amount.to_major(),
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use api_types::account::{AccountStatus, AccountType};

    use super::*;

    fn account(id: i64, balance: f64) -> Account {
        Account {
            id,
            account_type: AccountType::Checking,
            balance: Some(balance),
            status: AccountStatus::Active,
            open_date: None,
            close_date: None,
        }
    }

    fn draft<'a>(from: &'a Account, to: &'a Account, cents: i64) -> TransferDraft<'a> {
        TransferDraft {
            from: Some(from),
            to: Some(to),
            amount: MoneyCents::new(cents),
            description: Some("  rent share ".to_string()),
        }
    }

    #[test]
    fn valid_transfer_builds_body() {
        let (a, b) = (account(1, 100.0), account(2, 0.0));
        let body = draft(&a, &b, 100_00).validate().unwrap();
        assert_eq!(body.from_account_id, 1);
        assert_eq!(body.to_account_id, 2);
        assert_eq!(body.amount, 100.0);
        assert_eq!(body.description.as_deref(), Some("rent share"));
    }

    #[test]
    fn rejects_invalid_drafts() {
        let (a, b) = (account(1, 100.0), account(2, 0.0));
        assert!(matches!(
            draft(&a, &a, 10).validate(),
            Err(EngineError::InvalidTransfer(_))
        ));
        assert!(draft(&a, &b, 0).validate().is_err());
        assert!(draft(&a, &b, -5).validate().is_err());
        assert!(draft(&a, &b, 100_01).validate().is_err());

        let missing = TransferDraft {
            from: Some(&a),
            to: None,
            amount: MoneyCents::new(1),
            description: None,
        };
        assert!(missing.validate().is_err());
    }
}
