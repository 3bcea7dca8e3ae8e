use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::Utc;

use crate::dtos::dashboard::{recent_projects, DashboardMetrics, DashboardResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::project::{funded_projects_sql, ProjectWithFunding};
use crate::models::user::UserType;
use crate::state::AppState;

pub async fn get_dashboard(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<i64>,
) -> Result<Json<DashboardResponse>, AppError> {
    if auth.user_id != user_id && auth.user_type != UserType::Admin {
        return Err(AppError::forbidden("You can only view your own dashboard"));
    }

    let sql = funded_projects_sql("p.user_id = $1");
    let projects = sqlx::query_as::<_, ProjectWithFunding>(&sql)
        .bind(user_id)
        .fetch_all(&db_pool)
        .await?;

    let today = Utc::now().date_naive();
    Ok(Json(DashboardResponse {
        success: true,
        metrics: DashboardMetrics::from_projects(&projects, today),
        recent_projects: recent_projects(&projects),
    }))
}
