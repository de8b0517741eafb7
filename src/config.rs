//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "drink-water")]
#[command(about = "A state-managed hydration reminder companion daemon")]
#[command(version)]
pub struct Config {
    /// Port to bind the control surface to
    #[arg(short, long, default_value = "20710")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Default reminder interval in seconds, used until a persisted setting exists
    #[arg(short, long, default_value = "3600")]
    pub interval: u64,

    /// Startup screen dwell time in seconds
    #[arg(long, default_value = "3")]
    pub startup_dwell: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Startup dwell as a duration
    pub fn dwell(&self) -> Duration {
        Duration::from_secs(self.startup_dwell)
    }
}
