use crate::cli::EnumerateArgs;
use crate::types::{Config, SubzeroError};
use std::env;
use std::time::Duration;

/// Defaults, then `SUBZERO_*` environment variables, then command-line flags.
pub fn load_config(args: &EnumerateArgs) -> Result<Config, SubzeroError> {
    let mut config = Config::default();

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    apply_arg_overrides(&mut config, args);
    validate_config(&config)?;

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), SubzeroError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(secs) = lookup("SUBZERO_TIMEOUT") {
        config.timeout = Duration::from_secs(parse_number("SUBZERO_TIMEOUT", &secs)?);
    }
    if let Some(user_agent) = lookup("SUBZERO_USER_AGENT") {
        config.user_agent = user_agent;
    }
    if let Some(proxy) = lookup("SUBZERO_PROXY") {
        config.proxy = Some(proxy).filter(|p| !p.trim().is_empty());
    }
    if let Some(concurrency) = lookup("SUBZERO_CONCURRENCY") {
        config.concurrency = parse_number("SUBZERO_CONCURRENCY", &concurrency)?;
    }
    if let Some(max_pages) = lookup("SUBZERO_MAX_PAGES") {
        config.max_pages = parse_number("SUBZERO_MAX_PAGES", &max_pages)?;
    }
    Ok(())
}

fn apply_arg_overrides(config: &mut Config, args: &EnumerateArgs) {
    if let Some(sources) = &args.sources {
        config.sources = sources.iter().map(|s| s.trim().to_lowercase()).collect();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(secs) = args.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.deadline {
        config.deadline = Some(Duration::from_secs(secs));
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SubzeroError> {
    value
        .trim()
        .parse()
        .map_err(|_| SubzeroError::ConfigError(format!("{} must be a number, got {:?}", key, value)))
}

pub fn validate_config(config: &Config) -> Result<(), SubzeroError> {
    if config.timeout.is_zero() {
        return Err(SubzeroError::ConfigError("Timeout must be greater than 0".to_string()));
    }
    if config.concurrency == 0 {
        return Err(SubzeroError::ConfigError("Concurrency must be greater than 0".to_string()));
    }
    if config.max_pages == 0 {
        return Err(SubzeroError::ConfigError("Max pages must be greater than 0".to_string()));
    }
    if config.buffer_factor == 0 {
        return Err(SubzeroError::ConfigError("Buffer factor must be greater than 0".to_string()));
    }
    if config.sources.is_empty() {
        return Err(SubzeroError::ConfigError("No sources selected".to_string()));
    }
    Ok(())
}
