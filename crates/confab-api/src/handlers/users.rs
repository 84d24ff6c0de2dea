//! User handlers

use axum::{extract::State, Json};
use confab_service::{AuthService, UserResponse};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Get the caller's own profile
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let service = AuthService::new(state.services());
    let response = service.me(auth.user_id).await?;
    Ok(Json(response))
}
