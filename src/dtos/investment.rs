use serde::{Deserialize, Serialize};

use super::{lenient_f64, lenient_i64, positive_amount};
use crate::error::AppError;
use crate::models::investment::{Investment, InvestmentWithProject, PortfolioEntry};

#[derive(Deserialize)]
pub struct InvestRequest {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub investment_amount: Option<f64>,
}

impl InvestRequest {
    /// Returns `(project_id, amount)`.
    pub fn validate(self) -> Result<(i64, f64), AppError> {
        let project_id = self
            .project_id
            .ok_or_else(|| AppError::validation("Project is required"))?;
        let amount = positive_amount(self.investment_amount)
            .ok_or_else(|| AppError::validation("Invalid investment amount"))?;
        Ok((project_id, amount))
    }
}

#[derive(Serialize)]
pub struct InvestResponse {
    pub success: bool,
    pub message: &'static str,
    pub investment: Investment,
    pub balance: f64,
}

#[derive(Serialize)]
pub struct InvestmentListResponse {
    pub success: bool,
    pub investments: Vec<InvestmentWithProject>,
}

#[derive(Debug, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub total_invested: f64,
    pub active_investments: i64,
    pub total_investments: i64,
}

#[derive(Serialize)]
pub struct InvestmentSummaryResponse {
    pub success: bool,
    pub summary: InvestmentSummary,
}

#[derive(Serialize)]
pub struct PortfolioResponse {
    pub success: bool,
    pub portfolio: Vec<PortfolioEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(json: &str) -> Result<(i64, f64), AppError> {
        serde_json::from_str::<InvestRequest>(json).unwrap().validate()
    }

    #[test]
    fn accepts_route_param_project_id() {
        assert_eq!(validate(r#"{"project_id":"12","investment_amount":500}"#).unwrap(), (12, 500.0));
    }

    #[test]
    fn rejects_bad_amounts_and_missing_project() {
        assert!(validate(r#"{"project_id":1,"investment_amount":0}"#).is_err());
        assert!(validate(r#"{"project_id":1,"investment_amount":-3}"#).is_err());
        assert!(validate(r#"{"project_id":1}"#).is_err());
        assert!(validate(r#"{"investment_amount":10}"#).is_err());
    }

    #[test]
    fn summary_uses_client_field_names() {
        let v = serde_json::to_value(InvestmentSummary {
            total_invested: 10.0,
            active_investments: 1,
            total_investments: 2,
        })
        .unwrap();
        assert_eq!(v["totalInvested"], 10.0);
        assert_eq!(v["activeInvestments"], 1);
        assert_eq!(v["totalInvestments"], 2);
    }
}
