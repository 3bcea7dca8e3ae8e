use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::dtos::investment::{
    InvestRequest, InvestResponse, InvestmentListResponse, InvestmentSummary, InvestmentSummaryResponse,
    PortfolioResponse,
};
use crate::error::AppError;
use crate::handlers::wallet::record_ledger_entry;
use crate::middleware::auth::AuthContext;
use crate::models::investment::{
    Investment, InvestmentWithProject, LedgerKind, PortfolioEntry, INVESTMENT_ACTIVE, INVESTMENT_COLUMNS,
};
use crate::models::project::{Project, PROJECT_COLUMNS};
use crate::models::user::UserType;
use crate::state::AppState;

const INSUFFICIENT_BALANCE: &str = "Insufficient balance";

pub async fn invest(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<InvestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InvestResponse>), AppError> {
    let Json(req) = payload?;
    let (project_id, amount) = req.validate()?;

    if auth.user_type != UserType::Investor {
        return Err(AppError::forbidden("Only investors can invest in projects"));
    }

    // Dropping `tx` on any early return rolls the whole investment back.
    let mut tx = db_pool.begin().await?;

    // FOR SHARE keeps the project from being deleted underneath us.
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = $1 FOR SHARE");
    let project = sqlx::query_as::<_, Project>(&sql)
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    if project.user_id == auth.user_id {
        return Err(AppError::validation("You cannot invest in your own project"));
    }
    if !project.is_active_on(Utc::now().date_naive()) {
        return Err(AppError::validation("Project is no longer accepting investments"));
    }

    // Row lock serialises concurrent investments from the same investor.
    let balance: f64 = sqlx::query_scalar("SELECT (balance)::FLOAT8 FROM users WHERE id = $1 FOR UPDATE")
        .bind(auth.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if balance < amount {
        return Err(AppError::validation(INSUFFICIENT_BALANCE));
    }

    let sql = format!(
        "INSERT INTO investments AS i (investor_id, project_id, investment_amount, investment_status)
         VALUES ($1, $2, $3::FLOAT8, $4)
         RETURNING {INVESTMENT_COLUMNS}"
    );
    let investment = sqlx::query_as::<_, Investment>(&sql)
        .bind(auth.user_id)
        .bind(project.id)
        .bind(amount)
        .bind(INVESTMENT_ACTIVE)
        .fetch_one(&mut *tx)
        .await?;

    let new_balance: f64 = sqlx::query_scalar(
        "UPDATE users SET balance = balance - $1::FLOAT8, updated_at = NOW()
         WHERE id = $2 AND balance >= $1::FLOAT8
         RETURNING (balance)::FLOAT8",
    )
    .bind(amount)
    .bind(auth.user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::validation(INSUFFICIENT_BALANCE))?;

    record_ledger_entry(
        &mut tx,
        auth.user_id,
        LedgerKind::Investment,
        amount,
        new_balance,
        Some(investment.investment_id),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        investment_id = investment.investment_id,
        investor_id = auth.user_id,
        project_id = project.id,
        amount,
        balance = new_balance,
        "Investment committed"
    );

    Ok((
        StatusCode::CREATED,
        Json(InvestResponse {
            success: true,
            message: "Investment successful",
            investment,
            balance: new_balance,
        }),
    ))
}

pub async fn list_user_investments(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<InvestmentListResponse>, AppError> {
    let sql = format!(
        "SELECT {INVESTMENT_COLUMNS}, p.title AS project_title
         FROM investments i
         JOIN projects p ON p.id = i.project_id
         WHERE i.investor_id = $1
         ORDER BY i.investment_date DESC, i.investment_id DESC"
    );
    let investments = sqlx::query_as::<_, InvestmentWithProject>(&sql)
        .bind(auth.user_id)
        .fetch_all(&db_pool)
        .await?;

    Ok(Json(InvestmentListResponse { success: true, investments }))
}

pub async fn investment_summary(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<InvestmentSummaryResponse>, AppError> {
    let summary = sqlx::query_as::<_, InvestmentSummary>(
        "SELECT COALESCE(SUM(investment_amount), 0)::FLOAT8 AS total_invested,
                COUNT(*) FILTER (WHERE investment_status = $2) AS active_investments,
                COUNT(*) AS total_investments
         FROM investments
         WHERE investor_id = $1",
    )
    .bind(auth.user_id)
    .bind(INVESTMENT_ACTIVE)
    .fetch_one(&db_pool)
    .await?;

    Ok(Json(InvestmentSummaryResponse { success: true, summary }))
}

pub async fn portfolio(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let portfolio = sqlx::query_as::<_, PortfolioEntry>(
        "SELECT p.id, p.user_id, p.title,
                mine.invested::FLOAT8 AS investment_amount,
                (p.funding_goal)::FLOAT8 AS funding_goal,
                totals.raised::FLOAT8 AS current_funding,
                totals.investors AS total_investors,
                p.end_date
         FROM (
             SELECT project_id, SUM(investment_amount) AS invested, MAX(investment_date) AS last_invested
             FROM investments
             WHERE investor_id = $1
             GROUP BY project_id
         ) mine
         JOIN projects p ON p.id = mine.project_id
         JOIN (
             SELECT project_id, SUM(investment_amount) AS raised, COUNT(DISTINCT investor_id) AS investors
             FROM investments
             GROUP BY project_id
         ) totals ON totals.project_id = p.id
         ORDER BY mine.last_invested DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(PortfolioResponse { success: true, portfolio }))
}
