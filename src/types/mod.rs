//! Core types for PocketChat.

pub mod message;

pub use message::*;
