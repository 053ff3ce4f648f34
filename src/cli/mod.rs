//! Command-line flags for the server binary.

use clap::Parser;

use crate::config::ChatConfig;

/// Ultra-lightweight AI chat for feature phones
#[derive(Parser, Debug)]
#[command(name = "pocketchat", version, about = "PocketChat: lightweight web chat for hosted LLMs")]
pub struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply flag overrides on top of an environment-derived config.
    pub fn apply(&self, mut config: ChatConfig) -> ChatConfig {
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
