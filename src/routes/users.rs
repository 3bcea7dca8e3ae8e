use axum::{Router, routing::{post, get, put}, middleware};
use crate::state::AppState;
use crate::handlers::user::{
    register_user, login_user, get_profile, update_profile, request_password_reset, reset_password,
};
use crate::middleware::auth::require_auth;

pub fn routes(state: &AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password));

    let protected = Router::new()
        .route("/user-profile", get(get_profile))
        .route("/update-profile", put(update_profile))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    open.merge(protected)
}
