//! Configuration (layered: CLI flags > environment / `.env` > defaults).

use std::fmt;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SESSION_SECRET: &str = "ultra-lightweight-chat-secret";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Runtime configuration for the chat server.
#[derive(Clone)]
pub struct ChatConfig {
    /// Secret used to sign the session cookie.
    pub session_secret: String,
    /// Groq API key. `None` leaves the completion client uninitialized.
    pub api_key: Option<String>,
    /// Override for the Groq API base URL.
    pub base_url: Option<String>,
    pub model: String,
    pub host: String,
    pub port: u16,
    /// Idle lifetime of a session.
    pub session_ttl: Duration,
    pub max_sessions: usize,
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("session_secret", &"..")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("session_ttl", &self.session_ttl)
            .field("max_sessions", &self.max_sessions)
            .finish()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            session_ttl: DEFAULT_SESSION_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ChatConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            session_secret: non_empty("SESSION_SECRET").unwrap_or(defaults.session_secret),
            api_key: non_empty("GROQ_API_KEY"),
            base_url: non_empty("GROQ_BASE_URL"),
            model: non_empty("GROQ_MODEL").unwrap_or(defaults.model),
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", non_empty("PORT"), defaults.port),
            session_ttl: Duration::from_secs(parse_or(
                "SESSION_TTL_SECS",
                non_empty("SESSION_TTL_SECS"),
                defaults.session_ttl.as_secs(),
            )),
            max_sessions: parse_or("MAX_SESSIONS", non_empty("MAX_SESSIONS"), defaults.max_sessions),
        }
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %value, "Ignoring unparseable setting");
            default
        }),
        None => default,
    }
}
