use serde::{Deserialize, Serialize};

use super::{lenient_f64, positive_amount};
use crate::error::AppError;
use crate::models::investment::WalletTransaction;

pub const MAX_DEPOSIT: f64 = 1_000_000_000.0;

#[derive(Deserialize)]
pub struct DepositRequest {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
}

impl DepositRequest {
    pub fn validate(self) -> Result<f64, AppError> {
        match positive_amount(self.amount) {
            Some(amount) if amount <= MAX_DEPOSIT => Ok(amount),
            Some(_) => Err(AppError::validation("Deposit exceeds the maximum allowed amount")),
            None => Err(AppError::validation("Invalid amount")),
        }
    }
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub balance: f64,
}

#[derive(Serialize)]
pub struct TransactionHistoryResponse {
    pub success: bool,
    pub transactions: Vec<WalletTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(json: &str) -> Result<f64, AppError> {
        serde_json::from_str::<DepositRequest>(json).unwrap().validate()
    }

    #[test]
    fn accepts_positive_amounts() {
        assert_eq!(amount(r#"{"amount": 250.5}"#).unwrap(), 250.5);
        assert_eq!(amount(r#"{"amount": "1000"}"#).unwrap(), 1000.0);
    }

    #[test]
    fn rejects_missing_zero_negative_and_huge() {
        assert!(amount("{}").is_err());
        assert!(amount(r#"{"amount": 0}"#).is_err());
        assert!(amount(r#"{"amount": -5}"#).is_err());
        assert!(amount(r#"{"amount": 1e12}"#).is_err());
    }
}
