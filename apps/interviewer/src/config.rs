use std::time::Duration;

use anyhow::{Context, Result};

/// Skills offered as "untested" hints to the question writer when
/// `SKILL_CATALOGUE` is not set.
pub const DEFAULT_SKILL_CATALOGUE: [&str; 7] = [
    "Basic Formulas and Functions",
    "Data Manipulation and Cleaning",
    "Lookup Functions (VLOOKUP, INDEX/MATCH)",
    "Pivot Tables and Data Analysis",
    "Data Visualization and Charts",
    "Conditional Logic and IF Statements",
    "Advanced Functions and Array Formulas",
];

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Model behind the question writer, reviewer, recruiter and datasets.
    pub pro_model: String,
    /// Model behind the conversational interviewer.
    pub lite_model: String,
    pub pro_rate_limit: usize,
    pub lite_rate_limit: usize,
    pub rate_limit_window: Duration,
    pub llm_max_attempts: u32,
    /// Used when a start request does not set `max_questions`.
    pub max_questions: usize,
    pub skill_catalogue: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pro_model: std::env::var("PRO_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-5".to_string()),
            lite_model: std::env::var("LITE_MODEL")
                .unwrap_or_else(|_| "claude-haiku-4-5".to_string()),
            pro_rate_limit: parse_env("PRO_RATE_LIMIT", 15)?,
            lite_rate_limit: parse_env("LITE_RATE_LIMIT", 60)?,
            rate_limit_window: Duration::from_secs(parse_env("RATE_LIMIT_WINDOW_SECS", 60)?),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            max_questions: parse_env("MAX_QUESTIONS", 10)?,
            skill_catalogue: std::env::var("SKILL_CATALOGUE")
                .map(|raw| parse_catalogue(&raw))
                .unwrap_or_else(|_| default_catalogue()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

/// `;`-separated list. An empty result falls back to the default catalogue.
fn parse_catalogue(raw: &str) -> Vec<String> {
    let skills: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if skills.is_empty() {
        default_catalogue()
    } else {
        skills
    }
}

pub fn default_catalogue() -> Vec<String> {
    DEFAULT_SKILL_CATALOGUE.iter().map(|s| s.to_string()).collect()
}
