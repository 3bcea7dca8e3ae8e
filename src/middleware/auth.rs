use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::auth::jwt::verify_token;
use crate::models::user::UserType;
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub user_type: UserType,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let auth_header = match req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return reject(StatusCode::UNAUTHORIZED, "Access token missing"),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ").map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return reject(StatusCode::UNAUTHORIZED, "Access token missing"),
    };

    let claims = match verify_token(token, &state.config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = ?e, "Token verification failed");
            return reject(StatusCode::FORBIDDEN, "Invalid token");
        }
    };

    let user_type = match claims.user_type.parse::<UserType>() {
        Ok(t) => t,
        Err(_) => return reject(StatusCode::FORBIDDEN, "Invalid token"),
    };

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        username: claims.username,
        user_type,
    });

    next.run(req).await
}

fn reject(status: StatusCode, msg: &str) -> Response {
    let body = axum::Json(ErrorBody { success: false, message: msg.to_string() });
    (status, body).into_response()
}
