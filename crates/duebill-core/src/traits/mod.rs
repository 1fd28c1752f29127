//! Trait seams implemented elsewhere in the workspace.

pub mod channel;

pub use channel::Channel;
