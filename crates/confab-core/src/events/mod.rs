//! Wire events exchanged over the live transport

mod wire;

pub use wire::{ClientEvent, MessageRecord, SenderProfile, ServerEvent};
