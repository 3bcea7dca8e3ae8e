use axum::{
    routing::{delete, get, post, put},
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::{dashboard, project};
use crate::middleware::auth::require_auth;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/create-project", post(project::create_project))
        .route("/projects", get(project::list_projects))
        .route("/projects/{id}", get(project::get_project))
        .route("/user-projects/{user_id}", get(project::list_user_projects))
        .route("/update-project/{id}", put(project::update_project))
        .route("/delete-project/{id}", delete(project::delete_project))
        .route("/dashboard-data/{user_id}", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
