use crate::cli::Cli;
use crate::news::fetch::{DEFAULT_ENDPOINT, MAX_PAGE_SIZE, SearchParams};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, fs, path::Path, path::PathBuf};

const DEFAULT_QUERY: &str = "cybersecurity OR data breach OR malware OR ransomware";
const DEFAULT_DOMAINS: &[&str] = &[
    "thehackernews.com",
    "bleepingcomputer.com",
    "darkreading.com",
    "securityweek.com",
    "infosecurity-magazine.com",
    "threatpost.com",
];
const INTERACTIVE_TIMEOUT_SECS: u64 = 10;

/// On-disk config.toml. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub query: Option<String>,
    pub domains: Option<Vec<String>>,
    pub page_size: Option<u8>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_key: Option<String>,
    pub query: String,
    pub domains: Vec<String>,
    pub page_size: u8,
    pub endpoint: String,
    pub timeout_secs: Option<u64>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

impl RuntimeConfig {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            query: self.query.clone(),
            language: "en".into(),
            sort_by: "publishedAt".into(),
            page_size: self.page_size,
            domains: self.domains.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The interactive reader never waits without bound.
    pub fn interactive_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(INTERACTIVE_TIMEOUT_SECS))
    }
}

pub fn load(cli: &Cli) -> Result<RuntimeConfig> {
    let file = match &cli.config {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.is_file() => read_config(&path)?,
            _ => AppConfig::default(),
        },
    };
    resolve(file, cli)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let parsed = toml::from_str(&txt)
        .with_context(|| format!("failed to parse toml: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(parsed)
}

/// Merge CLI flags over the file over built-in defaults.
pub fn resolve(file: AppConfig, cli: &Cli) -> Result<RuntimeConfig> {
    let page_size = cli.page_size.or(file.page_size).unwrap_or(MAX_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        bail!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}");
    }
    if file.timeout_secs == Some(0) || cli.timeout_secs == Some(0) {
        bail!("timeout_secs must be greater than zero");
    }

    let domains = cli
        .domains
        .clone()
        .or(file.domains)
        .map(|d| clean_domains(&d))
        .unwrap_or_else(|| DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect());

    Ok(RuntimeConfig {
        api_key: cli.api_key.clone().or(file.api_key).and_then(non_blank),
        query: cli
            .query
            .clone()
            .or(file.query)
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_QUERY.into()),
        domains,
        page_size,
        endpoint: file.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.into()),
        timeout_secs: cli.timeout_secs.or(file.timeout_secs),
        open_command: file.open_command.and_then(non_blank),
        header: file.header,
    })
}

pub fn clean_domains<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .flat_map(|d| d.as_ref().split(','))
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

fn non_blank(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("cyber-news");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("cyber-news");
        p.push("config.toml");
        return Some(p);
    }
    None
}
