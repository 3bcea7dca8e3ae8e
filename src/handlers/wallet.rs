use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::Json;
use sqlx::{Postgres, Transaction};

use crate::dtos::MAX_MONEY;
use crate::dtos::wallet::{BalanceResponse, DepositRequest, TransactionHistoryResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::investment::{LedgerKind, WalletTransaction};
use crate::state::AppState;

pub async fn get_balance(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance: Option<f64> = sqlx::query_scalar("SELECT (balance)::FLOAT8 FROM users WHERE id = $1")
        .bind(auth.user_id)
        .fetch_optional(&db_pool)
        .await?;

    Ok(Json(BalanceResponse {
        success: true,
        message: None,
        balance: balance.unwrap_or(0.0),
    }))
}

pub async fn deposit(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> Result<Json<BalanceResponse>, AppError> {
    let Json(req) = payload?;
    let amount = req.validate()?;

    let mut tx = db_pool.begin().await?;

    let current: f64 = sqlx::query_scalar("SELECT (balance)::FLOAT8 FROM users WHERE id = $1 FOR UPDATE")
        .bind(auth.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if current + amount > MAX_MONEY {
        return Err(AppError::validation("Deposit would exceed the maximum wallet balance"));
    }

    let balance: f64 = sqlx::query_scalar(
        "UPDATE users SET balance = balance + $1::FLOAT8, updated_at = NOW()
         WHERE id = $2
         RETURNING (balance)::FLOAT8",
    )
    .bind(amount)
    .bind(auth.user_id)
    .fetch_one(&mut *tx)
    .await?;

    record_ledger_entry(&mut tx, auth.user_id, LedgerKind::Deposit, amount, balance, None).await?;
    tx.commit().await?;

    tracing::info!(user_id = auth.user_id, amount, balance, "Deposit committed");

    Ok(Json(BalanceResponse {
        success: true,
        message: Some("Deposit successful"),
        balance,
    }))
}

pub async fn transaction_history(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<TransactionHistoryResponse>, AppError> {
    let transactions = sqlx::query_as::<_, WalletTransaction>(
        "SELECT id, user_id, kind, (amount)::FLOAT8 AS amount, (balance_after)::FLOAT8 AS balance_after,
                investment_id, created_at
         FROM wallet_transactions
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(TransactionHistoryResponse { success: true, transactions }))
}

/// Appends one row to the wallet ledger inside the caller's transaction.
pub(crate) async fn record_ledger_entry(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    kind: LedgerKind,
    amount: f64,
    balance_after: f64,
    investment_id: Option<i64>,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO wallet_transactions (user_id, kind, amount, balance_after, investment_id)
         VALUES ($1, $2, $3::FLOAT8, $4::FLOAT8, $5)",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(amount)
    .bind(balance_after)
    .bind(investment_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
