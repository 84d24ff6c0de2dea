//! Request and response DTOs

mod requests;
mod responses;

pub use requests::{
    CreateConversationRequest, LoginRequest, RegisterRequest, SendMessageRequest,
};
pub use responses::{AuthResponse, ConversationResponse, UserResponse};
