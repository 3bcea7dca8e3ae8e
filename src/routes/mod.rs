pub mod conversations;
pub mod investments;
pub mod projects;
pub mod users;
pub mod wallet;

use axum::Router;
use crate::state::AppState;

pub fn create_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(users::routes(state))
        .merge(projects::routes(state))
        .merge(wallet::routes(state))
        .merge(investments::routes(state))
        .merge(conversations::routes(state))
}
