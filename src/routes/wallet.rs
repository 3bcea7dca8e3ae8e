use axum::{
    routing::{get, post},
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::wallet;
use crate::middleware::auth::require_auth;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/user-balance", get(wallet::get_balance))
        .route("/deposit", post(wallet::deposit))
        .route("/transaction-history", get(wallet::transaction_history))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
