//! # confab-service
//!
//! Application services orchestrating repositories, auth, and the live
//! broadcast path.

pub mod dto;
pub mod services;

pub use dto::{
    AuthResponse, ConversationResponse, CreateConversationRequest, LoginRequest, RegisterRequest,
    SendMessageRequest, UserResponse,
};
pub use services::{
    AuthService, ConversationService, MessageService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
