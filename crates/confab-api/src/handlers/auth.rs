//! Authentication handlers

use axum::{extract::State, Json};
use confab_service::{AuthResponse, AuthService, LoginRequest, RegisterRequest};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.services());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Log in with username and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.services());
    let response = service.login(request).await?;
    Ok(Json(response))
}
