use std::env;
use std::path::PathBuf;

use curator_core::AppError;
use curator_domain::DEFAULT_PAGE_SIZE;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_SESSION_FILE: &str = ".curator/session.json";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Http { api_base_url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub backend: BackendConfig,
    pub session_file: PathBuf,
    pub page_size: u32,
    pub http_timeout_seconds: u64,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let backend = match lookup("CURATOR_BACKEND")
            .unwrap_or_else(|| "http".to_owned())
            .trim()
        {
            "http" => BackendConfig::Http {
                api_base_url: api_base_url(&lookup)?,
            },
            "memory" => BackendConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "CURATOR_BACKEND must be either 'http' or 'memory', got '{other}'"
                )));
            }
        };

        let session_file = lookup("CURATOR_SESSION_FILE")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_owned());
        let page_size = parse_positive(&lookup, "CURATOR_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let http_timeout_seconds = parse_positive(
            &lookup,
            "CURATOR_HTTP_TIMEOUT_SECONDS",
            DEFAULT_HTTP_TIMEOUT_SECONDS,
        )?;

        Ok(Self {
            backend,
            session_file: PathBuf::from(session_file),
            page_size,
            http_timeout_seconds,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn api_base_url(lookup: &impl Fn(&str) -> Option<String>) -> Result<String, AppError> {
    let value = lookup("CURATOR_API_BASE_URL")
        .ok_or_else(|| AppError::Validation("CURATOR_API_BASE_URL is required".to_owned()))?;
    let trimmed = value.trim();
    Url::parse(trimmed).map_err(|error| {
        AppError::Validation(format!("invalid CURATOR_API_BASE_URL '{trimmed}': {error}"))
    })?;

    Ok(trimmed.trim_end_matches('/').to_owned())
}

fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };

    let parsed = value.trim().parse::<T>().map_err(|error| {
        AppError::Validation(format!("invalid {name} value '{value}': {error}"))
    })?;
    if parsed == T::default() {
        return Err(AppError::Validation(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(parsed)
}
