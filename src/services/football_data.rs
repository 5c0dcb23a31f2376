//! football-data.org v4 client.
//!
//! Every request passes through the shared [`RateLimiter`]. A 404 yields an empty
//! payload, a 429 triggers one cool-down and a single protocol-level retry, and any
//! other failure comes back as a [`SourceError`] for the job envelope to retry.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::SourceError;
use crate::services::rate_limiter::RateLimiter;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct FootballDataService {
    client: Client,
    api_token: String,
    base_url: String,
    limiter: Arc<RateLimiter>,
    rate_limit_cooldown: Duration,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdSeason {
    pub id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current_matchday: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdArea {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdContract {
    pub start: Option<String>,
    pub until: Option<String>,
}

/// Player, coach or scorer. Only `id` and `name` are reliably present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdPerson {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub position: Option<String>,
    pub shirt_number: Option<i32>,
    pub contract: Option<FdContract>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdTeamRef {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub tla: Option<String>,
    pub crest: Option<String>,
    pub coach: Option<FdPerson>,
    pub formation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FdScoreLine {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdScore {
    pub winner: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub full_time: FdScoreLine,
    #[serde(deserialize_with = "null_as_default")]
    pub half_time: FdScoreLine,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdReferee {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdGoal {
    pub minute: Option<i32>,
    pub injury_time: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub team: FdTeamRef,
    pub scorer: Option<FdPerson>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdBooking {
    pub minute: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub team: FdTeamRef,
    pub player: Option<FdPerson>,
    /// YELLOW_CARD, YELLOW_RED_CARD or RED_CARD
    pub card: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdCompetitionRef {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdMatch {
    pub id: Option<i64>,
    pub utc_date: Option<String>,
    pub status: Option<String>,
    pub matchday: Option<i32>,
    pub season: Option<FdSeason>,
    pub competition: Option<FdCompetitionRef>,
    #[serde(deserialize_with = "null_as_default")]
    pub home_team: FdTeamRef,
    #[serde(deserialize_with = "null_as_default")]
    pub away_team: FdTeamRef,
    #[serde(deserialize_with = "null_as_default")]
    pub score: FdScore,
    #[serde(deserialize_with = "null_as_default")]
    pub referees: Vec<FdReferee>,
    pub attendance: Option<i32>,
    pub venue: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub goals: Vec<FdGoal>,
    #[serde(deserialize_with = "null_as_default")]
    pub bookings: Vec<FdBooking>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdCompetition {
    pub id: i64,
    pub name: Option<String>,
    pub code: Option<String>,
    pub emblem: Option<String>,
    pub area: Option<FdArea>,
    pub current_season: Option<FdSeason>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdTableRow {
    pub position: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub team: FdTeamRef,
    pub played_games: i32,
    pub won: i32,
    pub draw: i32,
    pub lost: i32,
    pub points: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdStandingTable {
    pub stage: Option<String>,
    /// TOTAL, HOME or AWAY
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub group: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub table: Vec<FdTableRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandingsResponse {
    pub season: Option<FdSeason>,
    #[serde(deserialize_with = "null_as_default")]
    pub standings: Vec<FdStandingTable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdScorer {
    #[serde(deserialize_with = "null_as_default")]
    pub player: FdPerson,
    #[serde(deserialize_with = "null_as_default")]
    pub team: FdTeamRef,
    pub played_matches: Option<i32>,
    pub goals: Option<i32>,
    pub assists: Option<i32>,
    pub penalties: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScorersResponse {
    pub season: Option<FdSeason>,
    #[serde(deserialize_with = "null_as_default")]
    pub scorers: Vec<FdScorer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FdTeam {
    pub id: i64,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub tla: Option<String>,
    pub crest: Option<String>,
    pub venue: Option<String>,
    pub founded: Option<i32>,
    pub club_colors: Option<String>,
    pub website: Option<String>,
    pub coach: Option<FdPerson>,
    #[serde(deserialize_with = "null_as_default")]
    pub squad: Vec<FdPerson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MatchesResponse {
    #[serde(deserialize_with = "null_as_default")]
    matches: Vec<FdMatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompetitionsResponse {
    #[serde(deserialize_with = "null_as_default")]
    competitions: Vec<FdCompetition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TeamsResponse {
    #[serde(deserialize_with = "null_as_default")]
    teams: Vec<FdTeam>,
}

/// A single match as returned by `/matches/{id}`, with the raw body kept for storage.
#[derive(Debug, Clone)]
pub struct MatchDetailPayload {
    pub parsed: FdMatch,
    pub raw: Value,
}

impl FootballDataService {
    pub fn new(
        api_token: String,
        base_url: String,
        limiter: Arc<RateLimiter>,
        rate_limit_cooldown: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter,
            rate_limit_cooldown,
        })
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Matches by status, optionally scoped to one competition.
    pub async fn get_matches(
        &self,
        competition: Option<&str>,
        status: &str,
        limit: Option<u32>,
    ) -> Result<Vec<FdMatch>, SourceError> {
        let endpoint = match competition {
            Some(code) => format!("/competitions/{}/matches", code),
            None => "/matches".to_string(),
        };

        let mut query = vec![("status", status.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let response: MatchesResponse = self.get(&endpoint, &query).await?;
        tracing::info!(
            "Fetched {} {} matches for {}",
            response.matches.len(),
            status,
            competition.unwrap_or("all competitions")
        );
        Ok(response.matches)
    }

    /// Full match payload including goals and bookings. `None` when the match is unknown.
    pub async fn get_match(&self, match_id: i64) -> Result<Option<MatchDetailPayload>, SourceError> {
        let endpoint = format!("/matches/{}", match_id);
        match self.get_value(&endpoint, &[]).await? {
            None => Ok(None),
            Some(raw) => {
                let parsed: FdMatch = serde_json::from_value(raw.clone())?;
                Ok(Some(MatchDetailPayload { parsed, raw }))
            }
        }
    }

    pub async fn get_competitions(&self) -> Result<Vec<FdCompetition>, SourceError> {
        let response: CompetitionsResponse = self.get("/competitions", &[]).await?;
        tracing::info!("Fetched {} competitions", response.competitions.len());
        Ok(response.competitions)
    }

    pub async fn get_standings(&self, competition: &str) -> Result<StandingsResponse, SourceError> {
        let endpoint = format!("/competitions/{}/standings", competition);
        self.get(&endpoint, &[]).await
    }

    pub async fn get_scorers(
        &self,
        competition: &str,
        limit: Option<u32>,
    ) -> Result<ScorersResponse, SourceError> {
        let endpoint = format!("/competitions/{}/scorers", competition);
        let query: Vec<(&str, String)> = limit
            .map(|limit| vec![("limit", limit.to_string())])
            .unwrap_or_default();
        self.get(&endpoint, &query).await
    }

    pub async fn get_teams(&self, competition: &str, limit: u32) -> Result<Vec<FdTeam>, SourceError> {
        let endpoint = format!("/competitions/{}/teams", competition);
        let response: TeamsResponse = self.get(&endpoint, &[("limit", limit.to_string())]).await?;
        tracing::info!("Fetched {} teams for {}", response.teams.len(), competition);
        Ok(response.teams)
    }

    /// Team with coach and squad. `None` when the team is unknown.
    pub async fn get_team(&self, team_id: i64) -> Result<Option<FdTeam>, SourceError> {
        let endpoint = format!("/teams/{}", team_id);
        match self.get_value(&endpoint, &[]).await? {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_value(raw)?)),
        }
    }

    async fn get<T>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T, SourceError>
    where
        T: DeserializeOwned + Default,
    {
        match self.get_value(endpoint, query).await? {
            None => Ok(T::default()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Rate-limited GET. `Ok(None)` means 404.
    async fn get_value(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Option<Value>, SourceError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut cooled_down = false;

        loop {
            self.limiter.acquire().await;
            tracing::debug!("Requesting football-data {}", endpoint);

            let response = self
                .client
                .get(&url)
                .header("accept", "application/json")
                .header("X-Auth-Token", &self.api_token)
                .query(query)
                .send()
                .await?;

            let status = response.status();

            if status.is_success() {
                let body = response.bytes().await?;
                return Ok(Some(serde_json::from_slice(&body)?));
            }

            match status {
                StatusCode::NOT_FOUND => {
                    tracing::warn!("football-data resource not found: {}", endpoint);
                    return Ok(None);
                }
                StatusCode::TOO_MANY_REQUESTS if !cooled_down => {
                    tracing::warn!(
                        "football-data rate limit hit on {}, cooling down for {:?}",
                        endpoint,
                        self.rate_limit_cooldown
                    );
                    tokio::time::sleep(self.rate_limit_cooldown).await;
                    cooled_down = true;
                }
                StatusCode::TOO_MANY_REQUESTS => return Err(SourceError::RateLimited),
                _ => {
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!("football-data request {} failed: {} - {}", endpoint, status, body);
                    return Err(SourceError::Status { status, body });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_tolerates_nulls_and_missing_fields() {
        let raw = json!({
            "id": 42,
            "utcDate": "2024-08-16T19:00:00Z",
            "status": "TIMED",
            "homeTeam": {"id": 66, "name": "Manchester United FC"},
            "awayTeam": null,
            "score": {"winner": null, "fullTime": {"home": null, "away": null}, "halfTime": null},
            "referees": null
        });

        let parsed: FdMatch = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.id, Some(42));
        assert_eq!(parsed.home_team.id, Some(66));
        assert!(parsed.away_team.id.is_none());
        assert!(parsed.score.half_time.home.is_none());
        assert!(parsed.referees.is_empty());
        assert!(parsed.goals.is_empty());
    }

    #[test]
    fn test_standings_table_type_is_read() {
        let raw = json!({
            "season": {"id": 2287},
            "standings": [
                {"stage": "REGULAR_SEASON", "type": "TOTAL", "table": [
                    {"position": 1, "team": {"id": 57, "name": "Arsenal FC"},
                     "playedGames": 3, "won": 3, "draw": 0, "lost": 0, "points": 9,
                     "goalsFor": 7, "goalsAgainst": 1, "goalDifference": 6}
                ]},
                {"stage": "REGULAR_SEASON", "type": "HOME", "table": []}
            ]
        });

        let parsed: StandingsResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.season.and_then(|s| s.id), Some(2287));
        assert_eq!(parsed.standings.len(), 2);
        assert_eq!(parsed.standings[0].kind.as_deref(), Some("TOTAL"));
        assert_eq!(parsed.standings[0].table[0].goal_difference, 6);
    }
}
