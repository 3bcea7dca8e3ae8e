use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub const PROJECT_COLUMNS: &str = "p.id, p.user_id, p.title, p.description, \
    (p.funding_goal)::FLOAT8 AS funding_goal, p.category, p.start_date, p.end_date, \
    p.created_at, p.updated_at";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub funding_goal: f64,
    pub category: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Still open for investment on `today`.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectWithFunding {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub current_funding: f64,
    pub total_investors: i64,
}

impl ProjectWithFunding {
    pub fn is_funded(&self) -> bool {
        self.current_funding >= self.project.funding_goal
    }
}

/// Projects joined with their investment totals, filtered by `filter`
/// (a WHERE clause over alias `p`).
pub fn funded_projects_sql(filter: &str) -> String {
    format!(
        "SELECT {PROJECT_COLUMNS},
                COALESCE(SUM(i.investment_amount), 0)::FLOAT8 AS current_funding,
                COUNT(DISTINCT i.investor_id) AS total_investors
         FROM projects p
         LEFT JOIN investments i ON i.project_id = p.id
         WHERE {filter}
         GROUP BY p.id
         ORDER BY p.created_at DESC"
    )
}
