use serde::{Deserialize, Serialize};

use super::{lenient_i64, present};
use crate::error::AppError;
use crate::models::conversation::{Conversation, ConversationSummary, Message, MessageWithSender};

pub const MAX_MESSAGE_LEN: usize = 4000;

#[derive(Deserialize)]
pub struct StartConversationRequest {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub recipient_id: Option<i64>,
}

impl StartConversationRequest {
    pub fn validate(self) -> Result<(i64, i64), AppError> {
        match (self.project_id, self.recipient_id) {
            (Some(project_id), Some(recipient_id)) => Ok((project_id, recipient_id)),
            _ => Err(AppError::validation("project_id and recipient_id are required")),
        }
    }
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub receiver_id: Option<i64>,
}

impl SendMessageRequest {
    /// Returns the trimmed text and the receiver the client claims.
    pub fn validate(self) -> Result<(String, Option<i64>), AppError> {
        let text = present(self.message).ok_or_else(|| AppError::validation("Message cannot be empty"))?;
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(AppError::validation(format!(
                "Message cannot exceed {MAX_MESSAGE_LEN} characters"
            )));
        }
        Ok((text, self.receiver_id))
    }
}

#[derive(Serialize)]
pub struct ConversationListResponse {
    pub success: bool,
    pub conversations: Vec<ConversationSummary>,
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub success: bool,
    pub conversation: Conversation,
}

#[derive(Serialize)]
pub struct MessageListResponse {
    pub success: bool,
    pub messages: Vec<MessageWithSender>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_messages_are_rejected() {
        let req: SendMessageRequest = serde_json::from_str(r#"{"message":"   "}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn message_is_trimmed_and_receiver_parsed() {
        let req: SendMessageRequest = serde_json::from_str(r#"{"message":" hi ","receiver_id":"4"}"#).unwrap();
        assert_eq!(req.validate().unwrap(), ("hi".to_string(), Some(4)));
    }

    #[test]
    fn overlong_messages_are_rejected() {
        let body = serde_json::json!({ "message": "x".repeat(MAX_MESSAGE_LEN + 1) });
        let req: SendMessageRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn start_requires_both_ids() {
        let req: StartConversationRequest = serde_json::from_str(r#"{"project_id":1}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
