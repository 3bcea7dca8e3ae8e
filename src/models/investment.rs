use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub const INVESTMENT_ACTIVE: &str = "active";

pub const INVESTMENT_COLUMNS: &str = "i.investment_id, i.investor_id, i.project_id, \
    (i.investment_amount)::FLOAT8 AS investment_amount, i.investment_date, i.investment_status, \
    i.created_at, i.updated_at";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Investment {
    pub investment_id: i64,
    pub investor_id: i64,
    pub project_id: i64,
    pub investment_amount: f64,
    pub investment_date: DateTime<Utc>,
    pub investment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct InvestmentWithProject {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub investment: Investment,
    pub project_title: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PortfolioEntry {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub investment_amount: f64,
    pub funding_goal: f64,
    pub current_funding: f64,
    pub total_investors: i64,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Deposit,
    Investment,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Deposit => "deposit",
            LedgerKind::Investment => "investment",
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct WalletTransaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub amount: f64,
    pub balance_after: f64,
    pub investment_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
