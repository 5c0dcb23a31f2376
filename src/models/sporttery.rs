use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::sporttery::SportteryItem;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_FINISHED: &str = "finished";

const UNKNOWN_HOME: &str = "未知主队";
const UNKNOWN_AWAY: &str = "未知客队";
const UNKNOWN_LEAGUE: &str = "未知联赛";

/// A lottery fixture. Natural key: (match_code, group_date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportteryMatchRecord {
    pub match_code: String,
    pub group_date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub match_time: Option<NaiveDateTime>,
    pub status: String,
    pub actual_score: Option<String>,
    pub half_score: Option<String>,
}

/// Upstream scores and ids arrive as strings or numbers depending on the endpoint
fn text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_kickoff(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let raw = format!("{} {}", date?.trim(), time?.trim());
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M"))
        .ok()
}

impl SportteryMatchRecord {
    /// Map one entry of a date group. Returns `None` when no match code or group date
    /// can be derived.
    pub fn from_api(item: &SportteryItem, business_date: Option<&str>) -> Option<Self> {
        let match_code = item
            .match_num_str
            .clone()
            .filter(|code| !code.trim().is_empty())
            .or_else(|| match (text(&item.week), text(&item.num)) {
                (Some(week), Some(num)) => Some(format!("{}{}", week, num)),
                _ => text(&item.match_id),
            })?;

        let group_date = business_date
            .or(item.match_date.as_deref())
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())?;

        let (status, actual_score) = match (text(&item.home_score), text(&item.away_score)) {
            (Some(home), Some(away)) => (STATUS_FINISHED, Some(format!("{}-{}", home, away))),
            _ => (STATUS_PENDING, None),
        };

        Some(Self {
            match_code,
            group_date,
            home_team: item
                .home_team_abb_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_HOME.to_string()),
            away_team: item
                .away_team_abb_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_AWAY.to_string()),
            league: item
                .league_abb_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_LEAGUE.to_string()),
            match_time: parse_kickoff(item.match_date.as_deref(), item.match_time.as_deref()),
            status: status.to_string(),
            actual_score,
            half_score: item.half_score.clone().filter(|s| !s.trim().is_empty()),
        })
    }
}
