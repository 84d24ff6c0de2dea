//! Conversation handlers

use axum::{
    extract::{Path, State},
    Json,
};
use confab_service::{ConversationResponse, ConversationService, CreateConversationRequest};
use uuid::Uuid;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create a conversation
///
/// POST /conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateConversationRequest>,
) -> ApiResult<Created<Json<ConversationResponse>>> {
    let service = ConversationService::new(state.services());
    let response = service.create(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// List the caller's conversations
///
/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ConversationResponse>>> {
    let service = ConversationService::new(state.services());
    let response = service.list_for_user(auth.user_id).await?;
    Ok(Json(response))
}

/// Get one conversation
///
/// GET /conversations/{conversation_id}
pub async fn get_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> ApiResult<Json<ConversationResponse>> {
    let service = ConversationService::new(state.services());
    let response = service.get(conversation_id, auth.user_id).await?;
    Ok(Json(response))
}
