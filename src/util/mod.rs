//! Utility modules: retry and text truncation.

pub mod retry;
pub mod text;
