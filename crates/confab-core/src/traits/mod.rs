//! Repository traits (ports)

mod repositories;

pub use repositories::{
    ConversationRepository, HistoryQuery, MessageRepository, RepoResult, UserRepository,
};
