//! User row model

use chrono::{DateTime, Utc};
use confab_core::User;
use uuid::Uuid;

/// Row of the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
        }
    }
}
