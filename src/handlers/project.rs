use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dtos::project::{ProjectDetailEnvelope, ProjectEnvelope, ProjectListResponse, ProjectRequest};
use crate::dtos::Ack;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::project::{funded_projects_sql, Project, ProjectWithFunding, PROJECT_COLUMNS};
use crate::state::AppState;

pub async fn create_project(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectEnvelope>), AppError> {
    if !auth.user_type.can_create_projects() {
        return Err(AppError::forbidden("Only entrepreneurs can create projects"));
    }
    let Json(req) = payload?;
    let fields = req.validate()?;

    let sql = format!(
        "INSERT INTO projects AS p (user_id, title, description, funding_goal, category, start_date, end_date)
         VALUES ($1, $2, $3, $4::FLOAT8, $5, $6, $7)
         RETURNING {PROJECT_COLUMNS}"
    );
    let project = sqlx::query_as::<_, Project>(&sql)
        .bind(auth.user_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.funding_goal)
        .bind(&fields.category)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .fetch_one(&db_pool)
        .await?;

    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(ProjectEnvelope {
            success: true,
            message: Some("Project created successfully"),
            project,
        }),
    ))
}

pub async fn list_projects(
    State(AppState { db_pool, .. }): State<AppState>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p ORDER BY p.created_at DESC");
    let projects = sqlx::query_as::<_, Project>(&sql).fetch_all(&db_pool).await?;
    Ok(Json(ProjectListResponse { success: true, projects }))
}

pub async fn get_project(
    State(AppState { db_pool, .. }): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProjectDetailEnvelope>, AppError> {
    let sql = funded_projects_sql("p.id = $1");
    let project = sqlx::query_as::<_, ProjectWithFunding>(&sql)
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;
    Ok(Json(ProjectDetailEnvelope { success: true, project }))
}

pub async fn list_user_projects(
    State(AppState { db_pool, .. }): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.user_id = $1 ORDER BY p.created_at DESC");
    let projects = sqlx::query_as::<_, Project>(&sql)
        .bind(user_id)
        .fetch_all(&db_pool)
        .await?;
    Ok(Json(ProjectListResponse { success: true, projects }))
}

pub async fn update_project(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<ProjectEnvelope>, AppError> {
    let Json(req) = payload?;
    let fields = req.validate()?;

    // Ownership is part of the WHERE clause; someone else's project reads as missing.
    let sql = format!(
        "UPDATE projects p
         SET title = $1, description = $2, funding_goal = $3::FLOAT8, category = $4,
             start_date = $5, end_date = $6, updated_at = NOW()
         WHERE p.id = $7 AND p.user_id = $8
         RETURNING {PROJECT_COLUMNS}"
    );
    let project = sqlx::query_as::<_, Project>(&sql)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.funding_goal)
        .bind(&fields.category)
        .bind(fields.start_date)
        .bind(fields.end_date)
        .bind(id)
        .bind(auth.user_id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    Ok(Json(ProjectEnvelope {
        success: true,
        message: Some("Project updated successfully"),
        project,
    }))
}

pub async fn delete_project(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, AppError> {
    let mut tx = db_pool.begin().await?;

    let owned = sqlx::query_scalar::<_, i64>("SELECT id FROM projects WHERE id = $1 AND user_id = $2 FOR UPDATE")
        .bind(id)
        .bind(auth.user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if owned.is_none() {
        return Err(AppError::not_found("Project not found"));
    }

    // Deleting would cascade away investors' money records.
    let funded: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM investments WHERE project_id = $1)")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if funded {
        return Err(AppError::conflict("Project has investments and cannot be deleted"));
    }

    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(project_id = id, user_id = auth.user_id, "Project deleted");
    Ok(Json(Ack::ok("Project deleted successfully")))
}
