use axum::{
    routing::get,
    Router, middleware,
};
use crate::state::AppState;
use crate::handlers::conversation;
use crate::middleware::auth::require_auth;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/conversations",
            get(conversation::list_conversations).post(conversation::start_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            get(conversation::list_messages).post(conversation::send_message),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}
