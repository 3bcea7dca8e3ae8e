use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;

use crate::dtos::conversation::{
    ConversationListResponse, ConversationResponse, MessageListResponse, MessageResponse, SendMessageRequest,
    StartConversationRequest,
};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::conversation::{
    ordered_participants, Conversation, ConversationSummary, Message, MessageWithSender,
};
use crate::state::AppState;

const MESSAGE_COLUMNS: &str =
    "m.message_id, m.conversation_id, m.sender_id, m.receiver_id, m.project_id, m.message_content, m.sent_at, m.is_read";

pub async fn list_conversations(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ConversationListResponse>, AppError> {
    let conversations = sqlx::query_as::<_, ConversationSummary>(
        "SELECT c.id, c.project_id, p.title AS project_title,
                c.user1_id, u1.username AS user1_name, u1.user_type AS user1_role,
                c.user2_id, u2.username AS user2_name, u2.user_type AS user2_role,
                lm.message_content AS last_message, lm.sent_at AS last_message_date
         FROM conversations c
         JOIN projects p ON p.id = c.project_id
         JOIN users u1 ON u1.id = c.user1_id
         JOIN users u2 ON u2.id = c.user2_id
         LEFT JOIN LATERAL (
             SELECT message_content, sent_at
             FROM messages m
             WHERE m.conversation_id = c.id
             ORDER BY m.sent_at DESC, m.message_id DESC
             LIMIT 1
         ) lm ON TRUE
         WHERE c.user1_id = $1 OR c.user2_id = $1
         ORDER BY COALESCE(lm.sent_at, c.created_at) DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(ConversationListResponse { success: true, conversations }))
}

pub async fn start_conversation(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<StartConversationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ConversationResponse>), AppError> {
    let Json(req) = payload?;
    let (project_id, recipient_id) = req.validate()?;

    if recipient_id == auth.user_id {
        return Err(AppError::validation("You cannot start a conversation with yourself"));
    }

    let owner_id: i64 = sqlx::query_scalar("SELECT user_id FROM projects WHERE id = $1")
        .bind(project_id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    let recipient_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(recipient_id)
        .fetch_one(&db_pool)
        .await?;
    if !recipient_exists {
        return Err(AppError::not_found("Recipient not found"));
    }

    if owner_id != auth.user_id && owner_id != recipient_id {
        return Err(AppError::validation("Conversations must include the project owner"));
    }

    let (user1_id, user2_id) = ordered_participants(auth.user_id, recipient_id);

    let created = sqlx::query_as::<_, Conversation>(
        "INSERT INTO conversations (project_id, user1_id, user2_id)
         VALUES ($1, $2, $3)
         ON CONFLICT (project_id, user1_id, user2_id) DO NOTHING
         RETURNING id, project_id, user1_id, user2_id, created_at",
    )
    .bind(project_id)
    .bind(user1_id)
    .bind(user2_id)
    .fetch_optional(&db_pool)
    .await?;

    let (status, conversation) = match created {
        Some(c) => (StatusCode::CREATED, c),
        None => {
            let existing = sqlx::query_as::<_, Conversation>(
                "SELECT id, project_id, user1_id, user2_id, created_at
                 FROM conversations
                 WHERE project_id = $1 AND user1_id = $2 AND user2_id = $3",
            )
            .bind(project_id)
            .bind(user1_id)
            .bind(user2_id)
            .fetch_one(&db_pool)
            .await?;
            (StatusCode::OK, existing)
        }
    };

    Ok((status, Json(ConversationResponse { success: true, conversation })))
}

pub async fn list_messages(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(conversation_id): Path<i64>,
) -> Result<Json<MessageListResponse>, AppError> {
    load_conversation_for(&db_pool, conversation_id, auth.user_id).await?;

    // Mark first so the returned rows already reflect what the caller has now seen.
    sqlx::query(
        "UPDATE messages SET is_read = TRUE, updated_at = NOW()
         WHERE conversation_id = $1 AND receiver_id = $2 AND NOT is_read",
    )
    .bind(conversation_id)
    .bind(auth.user_id)
    .execute(&db_pool)
    .await?;

    let sql = format!(
        "SELECT {MESSAGE_COLUMNS}, u.username AS sender_name
         FROM messages m
         JOIN users u ON u.id = m.sender_id
         WHERE m.conversation_id = $1
         ORDER BY m.sent_at ASC, m.message_id ASC"
    );
    let messages = sqlx::query_as::<_, MessageWithSender>(&sql)
        .bind(conversation_id)
        .fetch_all(&db_pool)
        .await?;

    Ok(Json(MessageListResponse { success: true, messages }))
}

pub async fn send_message(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(conversation_id): Path<i64>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(req) = payload?;
    let (text, claimed_receiver) = req.validate()?;

    let conversation = load_conversation_for(&db_pool, conversation_id, auth.user_id).await?;
    let receiver_id = conversation
        .other_participant(auth.user_id)
        .ok_or_else(|| AppError::not_found("Conversation not found"))?;

    if claimed_receiver.is_some_and(|claimed| claimed != receiver_id) {
        return Err(AppError::validation("Receiver is not part of this conversation"));
    }

    let sql = format!(
        "INSERT INTO messages AS m (conversation_id, sender_id, receiver_id, project_id, message_content)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {MESSAGE_COLUMNS}"
    );
    let message = sqlx::query_as::<_, Message>(&sql)
        .bind(conversation.id)
        .bind(auth.user_id)
        .bind(receiver_id)
        .bind(conversation.project_id)
        .bind(&text)
        .fetch_one(&db_pool)
        .await?;

    tracing::debug!(conversation_id, message_id = message.message_id, "Message stored");

    Ok((StatusCode::CREATED, Json(MessageResponse { success: true, message })))
}

/// Non-participants get the same 404 as a missing conversation.
async fn load_conversation_for(pool: &PgPool, conversation_id: i64, user_id: i64) -> Result<Conversation, AppError> {
    sqlx::query_as::<_, Conversation>(
        "SELECT id, project_id, user1_id, user2_id, created_at FROM conversations WHERE id = $1",
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?
    .filter(|c| c.has_participant(user_id))
    .ok_or_else(|| AppError::not_found("Conversation not found"))
}
