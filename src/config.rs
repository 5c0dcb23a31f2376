//! Process configuration, read once from the environment at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_FD_BASE_URL: &str = "https://api.football-data.org/v4";
const DEFAULT_SPORTTERY_BASE_URL: &str = "https://webapi.sporttery.cn";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/matchstats.db?mode=rwc";
const DEFAULT_MONITORED_LEAGUES: &str = "PL,BL1,SA,PD,FL1,CL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Per-job cadence. Every value is in minutes except live scores.
#[derive(Debug, Clone)]
pub struct JobIntervals {
    pub scheduled: Duration,
    pub results: Duration,
    pub standings: Duration,
    pub scorers: Duration,
    pub teams: Duration,
    pub competitions: Duration,
    pub team_details: Duration,
    pub match_details: Duration,
    pub live_scores: Duration,
    pub sporttery: Duration,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub fd_api_token: String,
    pub fd_base_url: String,
    pub sporttery_base_url: String,
    pub database_url: String,
    pub monitored_leagues: Vec<String>,
    pub fd_rate_limit: usize,
    pub fd_rate_window: Duration,
    pub fd_rate_limit_cooldown: Duration,
    pub sporttery_timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: u32,
    pub intervals: JobIntervals,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fd_api_token = lookup("FD_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("FD_API_TOKEN"))?;

        let minutes = |key: &'static str, default: u64| -> Result<Duration, ConfigError> {
            let value: u64 = number(&lookup, key, default)?;
            value
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    key,
                    value: value.to_string(),
                })
        };

        let intervals = JobIntervals {
            scheduled: minutes("UPDATE_FD_SCHEDULED", 1440)?,
            results: minutes("UPDATE_FD_RESULTS", 5)?,
            standings: minutes("UPDATE_FD_STANDINGS", 60)?,
            scorers: minutes("UPDATE_FD_SCORERS", 360)?,
            teams: minutes("UPDATE_FD_TEAMS", 1440)?,
            competitions: minutes("UPDATE_FD_COMPETITIONS", 1440)?,
            team_details: minutes("UPDATE_FD_TEAM_DETAILS", 1440)?,
            match_details: minutes("UPDATE_FD_MATCH_DETAILS", 30)?,
            live_scores: Duration::from_secs(number(&lookup, "UPDATE_FD_LIVE_SCORES_SECS", 30)?),
            sporttery: minutes("UPDATE_SPORTTERY", 720)?,
        };

        Ok(Self {
            fd_api_token,
            fd_base_url: lookup("FD_BASE_URL").unwrap_or_else(|| DEFAULT_FD_BASE_URL.to_string()),
            sporttery_base_url: lookup("SPORTTERY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SPORTTERY_BASE_URL.to_string()),
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            monitored_leagues: parse_leagues(
                &lookup("MONITORED_LEAGUES").unwrap_or_else(|| DEFAULT_MONITORED_LEAGUES.to_string()),
            ),
            fd_rate_limit: number(&lookup, "FD_RATE_LIMIT", 10)?,
            fd_rate_window: Duration::from_secs(number(&lookup, "FD_RATE_WINDOW", 60)?),
            fd_rate_limit_cooldown: Duration::from_secs(number(&lookup, "FD_RATE_LIMIT_COOLDOWN", 60)?),
            sporttery_timeout: Duration::from_secs(number(&lookup, "SPORTTERY_TIMEOUT", 15)?),
            max_retries: number(&lookup, "SYNC_MAX_RETRIES", 3)?,
            backoff_base: number(&lookup, "SYNC_BACKOFF_BASE", 2)?,
            intervals,
        })
    }
}

fn number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

/// Split a comma separated competition list, dropping blanks.
pub fn parse_leagues(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = Settings::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing("FD_API_TOKEN"))));

        let result = Settings::from_lookup(lookup_from(&[("FD_API_TOKEN", "  ")]));
        assert!(matches!(result, Err(ConfigError::Missing("FD_API_TOKEN"))));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[("FD_API_TOKEN", "abc")])).unwrap();

        assert_eq!(settings.fd_rate_limit, 10);
        assert_eq!(settings.fd_rate_window, Duration::from_secs(60));
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.backoff_base, 2);
        assert_eq!(settings.intervals.results, Duration::from_secs(300));
        assert_eq!(settings.intervals.live_scores, Duration::from_secs(30));
        assert_eq!(settings.intervals.sporttery, Duration::from_secs(720 * 60));
        assert_eq!(
            settings.monitored_leagues,
            vec!["PL", "BL1", "SA", "PD", "FL1", "CL"]
        );
    }

    #[test]
    fn test_invalid_number() {
        let result = Settings::from_lookup(lookup_from(&[
            ("FD_API_TOKEN", "abc"),
            ("FD_RATE_LIMIT", "ten"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { key: "FD_RATE_LIMIT", .. })
        ));
    }

    #[test]
    fn test_out_of_range_numbers_are_rejected() {
        let result = Settings::from_lookup(lookup_from(&[
            ("FD_API_TOKEN", "abc"),
            ("SYNC_MAX_RETRIES", "4294967296"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { key: "SYNC_MAX_RETRIES", .. })
        ));

        let result = Settings::from_lookup(lookup_from(&[
            ("FD_API_TOKEN", "abc"),
            ("UPDATE_FD_RESULTS", "18446744073709551615"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidNumber { key: "UPDATE_FD_RESULTS", .. })
        ));
    }

    #[test]
    fn test_parse_leagues_skips_blanks() {
        assert_eq!(parse_leagues(" PL, ,CL,"), vec!["PL", "CL"]);
    }
}
