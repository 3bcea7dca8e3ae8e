use axum::{
    routing::{get, post},
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::investment;
use crate::middleware::auth::require_auth;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/invest", post(investment::invest))
        .route("/user-investments", get(investment::list_user_investments))
        .route("/user-investment-summary", get(investment::investment_summary))
        .route("/portfolio", get(investment::portfolio))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
