//! Auth service
//!
//! Account registration and login; issues the access tokens that both the
//! REST API and the live transport handshake validate.

use confab_common::{hash_password, verify_password};
use confab_core::User;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Auth service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account and issue a token
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        if self
            .ctx
            .users()
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict("username".to_string()));
        }

        let password_hash =
            hash_password(&request.password).map_err(ServiceError::internal)?;

        let mut user = User::new(Uuid::new_v4(), request.username);
        user.display_name = request.display_name;

        self.ctx.users().create(&user, &password_hash).await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        self.issue(user)
    }

    /// Verify credentials and issue a token
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .users()
            .find_by_username(&request.username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let hash = self
            .ctx
            .users()
            .get_password_hash(user.id)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &hash).map_err(ServiceError::internal)? {
            return Err(ServiceError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");

        self.issue(user)
    }

    /// Fetch the caller's own profile
    pub async fn me(&self, user_id: Uuid) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        Ok(UserResponse::from(user))
    }

    fn issue(&self, user: User) -> ServiceResult<AuthResponse> {
        let token = self
            .ctx
            .jwt()
            .issue(user.id)
            .map_err(ServiceError::internal)?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.ctx.jwt().token_expiry_secs(),
        })
    }
}
