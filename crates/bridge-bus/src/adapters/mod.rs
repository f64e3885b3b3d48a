//! Platform adapters.

pub mod channel;

pub use channel::{ChannelFrame, ChannelPlatform};
