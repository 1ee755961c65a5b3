use clap::Parser;
use std::path::PathBuf;

/// Fetch recent cybersecurity news from a news search API.
///
/// Flags override values from the config file.
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a config.toml (defaults to $XDG_CONFIG_HOME/cyber-news/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// News API key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Keyword query, e.g. "ransomware OR malware"
    #[arg(short, long)]
    pub query: Option<String>,

    /// Comma-separated list of source domains to search
    #[arg(short, long, value_delimiter = ',')]
    pub domains: Option<Vec<String>>,

    /// Number of articles to fetch (1-100)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub page_size: Option<u8>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Open the interactive reader instead of printing once
    #[arg(short, long)]
    pub interactive: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
