//! PocketChat: ultra-lightweight web chat for hosted LLMs.
//!
//! Forwards user messages to a chat-completion API (Groq by default) and
//! renders short replies on tiny HTML pages suited to feature phones and slow
//! networks. Conversation history lives in an in-memory session store and is
//! trimmed aggressively.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pocketchat::completion::CompletionClient;
//! use pocketchat::config::ChatConfig;
//! use pocketchat::web::{self, AppState};
//!
//! # async fn example() -> pocketchat::error::Result<()> {
//! let config = ChatConfig::from_env();
//! let client = CompletionClient::from_config(&config);
//! let state = AppState::new(&config, Arc::new(client));
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! web::serve(listener, state).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod format;
pub mod provider;
pub mod session;
pub mod types;
pub mod util;
pub mod web;
