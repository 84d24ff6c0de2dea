//! Service context - dependency container for services

use std::sync::Arc;

use confab_common::JwtService;
use confab_core::{ConversationRepository, MessageRepository, UserRepository};
use confab_gateway::Dispatcher;

/// Service context containing all dependencies
///
/// Passed to every service. Provides access to the repositories, the JWT
/// service, and the broadcast dispatcher for the live push path.
#[derive(Clone)]
pub struct ServiceContext {
    users: Arc<dyn UserRepository>,
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
    jwt: Arc<JwtService>,
    dispatcher: Arc<Dispatcher>,
}

impl ServiceContext {
    /// Get the user repository
    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    /// Get the conversation repository
    pub fn conversations(&self) -> &dyn ConversationRepository {
        self.conversations.as_ref()
    }

    /// Get the message repository
    pub fn messages(&self) -> &dyn MessageRepository {
        self.messages.as_ref()
    }

    /// Get the conversation repository handle (for sharing with the gateway)
    pub fn conversations_arc(&self) -> Arc<dyn ConversationRepository> {
        Arc::clone(&self.conversations)
    }

    /// Get the JWT service
    pub fn jwt(&self) -> &Arc<JwtService> {
        &self.jwt
    }

    /// Get the broadcast dispatcher
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// Builder for `ServiceContext`
#[derive(Default)]
pub struct ServiceContextBuilder {
    users: Option<Arc<dyn UserRepository>>,
    conversations: Option<Arc<dyn ConversationRepository>>,
    messages: Option<Arc<dyn MessageRepository>>,
    jwt: Option<Arc<JwtService>>,
    dispatcher: Option<Arc<Dispatcher>>,
}

impl ServiceContextBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(mut self, users: Arc<dyn UserRepository>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn conversations(mut self, conversations: Arc<dyn ConversationRepository>) -> Self {
        self.conversations = Some(conversations);
        self
    }

    pub fn messages(mut self, messages: Arc<dyn MessageRepository>) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn jwt(mut self, jwt: Arc<JwtService>) -> Self {
        self.jwt = Some(jwt);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Build the context
    ///
    /// # Errors
    /// Returns the name of the first missing dependency
    pub fn build(self) -> Result<ServiceContext, &'static str> {
        Ok(ServiceContext {
            users: self.users.ok_or("users repository is required")?,
            conversations: self
                .conversations
                .ok_or("conversations repository is required")?,
            messages: self.messages.ok_or("messages repository is required")?,
            jwt: self.jwt.ok_or("jwt service is required")?,
            dispatcher: self.dispatcher.ok_or("dispatcher is required")?,
        })
    }
}
