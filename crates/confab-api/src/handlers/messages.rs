//! Message handlers

use axum::{
    extract::{Path, State},
    Json,
};
use confab_core::{HistoryQuery, MessageRecord};
use confab_service::{MessageService, SendMessageRequest};
use uuid::Uuid;

use crate::extractors::{AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Get messages in a conversation, oldest first
///
/// GET /conversations/{conversation_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
    pagination: Pagination,
) -> ApiResult<Json<Vec<MessageRecord>>> {
    let service = MessageService::new(state.services());
    let messages = service
        .history(
            conversation_id,
            auth.user_id,
            HistoryQuery {
                before: pagination.before,
                limit: i64::from(pagination.limit),
            },
        )
        .await?;
    Ok(Json(messages))
}

/// Send a message
///
/// POST /conversations/{conversation_id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageRecord>>> {
    let service = MessageService::new(state.services());
    let response = service
        .send_message(conversation_id, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}
