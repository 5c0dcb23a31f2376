use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::football_data::{
    FdCompetition, FdMatch, FdPerson, FdScorer, FdTableRow, FdTeam, FdTeamRef,
};

/// Standings table type that is persisted; HOME/AWAY splits are ignored
pub const STANDINGS_TOTAL: &str = "TOTAL";

/// A match row ready to upsert, keyed by `fd_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub fd_id: i64,
    pub league_code: String,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub home_team_name: Option<String>,
    pub away_team_name: Option<String>,
    pub match_date: NaiveDateTime,
    pub status: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub home_half_score: Option<i32>,
    pub away_half_score: Option<i32>,
    pub referee: Option<String>,
    pub attendance: Option<i32>,
    pub matchday: Option<i32>,
    pub season: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRecord {
    pub fd_id: i64,
    pub code: String,
    pub name: String,
    pub country: Option<String>,
    pub current_season: Option<i64>,
    pub emblem: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub fd_id: i64,
    pub name: String,
    pub short_name: Option<String>,
    pub tla: Option<String>,
    pub crest: Option<String>,
    pub venue: Option<String>,
    pub founded: Option<i32>,
    pub club_colors: Option<String>,
    pub website: Option<String>,
}

/// One row of a league table. Natural key: (league_code, team_id, season)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRecord {
    pub league_code: String,
    pub team_id: i64,
    pub team_name: String,
    pub season: Option<i64>,
    pub position: i32,
    pub played_games: i32,
    pub won: i32,
    pub draw: i32,
    pub lost: i32,
    pub points: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_diff: i32,
}

/// Natural key: (league_code, season, player_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerRecord {
    pub league_code: String,
    pub season: Option<i64>,
    pub player_id: i64,
    pub player_name: String,
    pub team_id: Option<i64>,
    pub team_name: String,
    pub position: i32,
    pub goals: i32,
    pub assists: i32,
    pub penalties: i32,
    pub played_matches: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetailsRecord {
    pub match_id: i64,
    pub home_formation: Option<String>,
    pub away_formation: Option<String>,
    pub home_coach_name: Option<String>,
    pub away_coach_name: Option<String>,
    pub home_goal_count: i32,
    pub away_goal_count: i32,
    pub home_yellow_cards: i32,
    pub away_yellow_cards: i32,
    pub home_red_cards: i32,
    pub away_red_cards: i32,
    pub details_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchGoalRecord {
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    pub minute: Option<i32>,
    pub minute_extra: Option<i32>,
    pub goal_type: String,
    pub home_away: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachRecord {
    pub team_id: i64,
    pub coach_id: Option<i64>,
    pub coach_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub contract_until: Option<String>,
}

/// Natural key: (team_id, player_id, season)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPlayerRecord {
    pub team_id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub position: Option<String>,
    pub shirt_number: Option<i32>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contract_until: Option<String>,
    pub season: Option<i32>,
}

/// Parse an upstream UTC timestamp such as "2024-08-16T19:00:00Z"
pub fn parse_utc(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc())
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok())
}

impl MatchRecord {
    /// Returns `None` for matches without an id, a parseable kickoff or a status.
    pub fn from_api(m: &FdMatch, league_code: &str) -> Option<Self> {
        let fd_id = m.id?;
        let match_date = m.utc_date.as_deref().and_then(parse_utc)?;
        let status = m.status.clone()?;

        let referee = m
            .referees
            .iter()
            .find(|r| r.kind.as_deref() == Some("REFEREE"))
            .or_else(|| m.referees.first())
            .and_then(|r| r.name.clone());

        Some(Self {
            fd_id,
            league_code: league_code.to_string(),
            home_team_id: m.home_team.id,
            away_team_id: m.away_team.id,
            home_team_name: m.home_team.name.clone(),
            away_team_name: m.away_team.name.clone(),
            match_date,
            status,
            home_score: m.score.full_time.home,
            away_score: m.score.full_time.away,
            home_half_score: m.score.half_time.home,
            away_half_score: m.score.half_time.away,
            referee,
            attendance: m.attendance,
            matchday: m.matchday,
            season: m.season.as_ref().and_then(|s| s.id),
        })
    }
}

impl LeagueRecord {
    pub fn from_api(c: &FdCompetition) -> Option<Self> {
        Some(Self {
            fd_id: c.id,
            code: c.code.clone()?,
            name: c.name.clone()?,
            country: c.area.as_ref().and_then(|a| a.name.clone()),
            current_season: c.current_season.as_ref().and_then(|s| s.id),
            emblem: c.emblem.clone(),
        })
    }
}

impl TeamRecord {
    pub fn from_api(t: &FdTeam) -> Option<Self> {
        Some(Self {
            fd_id: t.id,
            name: t.name.clone()?,
            short_name: t.short_name.clone(),
            tla: t.tla.clone(),
            crest: t.crest.clone(),
            venue: t.venue.clone(),
            founded: t.founded,
            club_colors: t.club_colors.clone(),
            website: t.website.clone(),
        })
    }
}

impl StandingRecord {
    pub fn from_api(league_code: &str, season: Option<i64>, row: &FdTableRow) -> Option<Self> {
        Some(Self {
            league_code: league_code.to_string(),
            team_id: row.team.id?,
            team_name: row.team.name.clone()?,
            season,
            position: row.position,
            played_games: row.played_games,
            won: row.won,
            draw: row.draw,
            lost: row.lost,
            points: row.points,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_diff: row.goal_difference,
        })
    }
}

impl ScorerRecord {
    /// `position` is the 1-based rank in the upstream list.
    pub fn from_api(
        league_code: &str,
        season: Option<i64>,
        position: i32,
        s: &FdScorer,
    ) -> Option<Self> {
        Some(Self {
            league_code: league_code.to_string(),
            season,
            player_id: s.player.id?,
            player_name: s.player.name.clone()?,
            team_id: s.team.id,
            team_name: s.team.name.clone().unwrap_or_default(),
            position,
            goals: s.goals.unwrap_or(0),
            assists: s.assists.unwrap_or(0),
            penalties: s.penalties.unwrap_or(0),
            played_matches: s.played_matches.unwrap_or(0),
        })
    }
}

impl CoachRecord {
    pub fn from_api(team_id: i64, coach: &FdPerson) -> Self {
        Self {
            team_id,
            coach_id: coach.id,
            coach_name: coach.name.clone(),
            first_name: coach.first_name.clone(),
            last_name: coach.last_name.clone(),
            date_of_birth: parse_date(coach.date_of_birth.as_deref()),
            nationality: coach.nationality.clone(),
            contract_until: coach.contract.as_ref().and_then(|c| c.until.clone()),
        }
    }
}

impl SquadPlayerRecord {
    pub fn from_api(team_id: i64, season: Option<i32>, player: &FdPerson) -> Option<Self> {
        Some(Self {
            team_id,
            player_id: player.id?,
            player_name: player.name.clone()?,
            position: player.position.clone(),
            shirt_number: player.shirt_number,
            nationality: player.nationality.clone(),
            date_of_birth: parse_date(player.date_of_birth.as_deref()),
            contract_until: player.contract.as_ref().and_then(|c| c.until.clone()),
            season,
        })
    }
}

fn side_of(team: &FdTeamRef, home: &FdTeamRef) -> &'static str {
    if team.id.is_some() && team.id == home.id {
        "home"
    } else {
        "away"
    }
}

/// Build the detail row and the goal list for one match.
///
/// Goal counts come from the goal list, falling back to the full-time score when the
/// upstream plan omits goal events. Bookings are folded into card totals; a second
/// yellow counts as a red.
pub fn match_details_from_api(
    match_id: i64,
    m: &FdMatch,
    raw: Option<&Value>,
) -> (MatchDetailsRecord, Vec<MatchGoalRecord>) {
    let goals: Vec<MatchGoalRecord> = m
        .goals
        .iter()
        .map(|g| MatchGoalRecord {
            team_id: g.team.id,
            team_name: g.team.name.clone(),
            player_id: g.scorer.as_ref().and_then(|p| p.id),
            player_name: g.scorer.as_ref().and_then(|p| p.name.clone()),
            minute: g.minute,
            minute_extra: g.injury_time,
            goal_type: g.kind.clone().unwrap_or_else(|| "REGULAR".to_string()),
            home_away: side_of(&g.team, &m.home_team).to_string(),
        })
        .collect();

    let (mut home_goals, mut away_goals) = (0, 0);
    for goal in &goals {
        if goal.home_away == "home" {
            home_goals += 1;
        } else {
            away_goals += 1;
        }
    }
    if goals.is_empty() {
        home_goals = m.score.full_time.home.unwrap_or(0);
        away_goals = m.score.full_time.away.unwrap_or(0);
    }

    let (mut home_yellow, mut away_yellow, mut home_red, mut away_red) = (0, 0, 0, 0);
    for booking in &m.bookings {
        let home = side_of(&booking.team, &m.home_team) == "home";
        match booking.card.as_deref() {
            Some("YELLOW_CARD") if home => home_yellow += 1,
            Some("YELLOW_CARD") => away_yellow += 1,
            Some("RED_CARD") | Some("YELLOW_RED_CARD") if home => home_red += 1,
            Some("RED_CARD") | Some("YELLOW_RED_CARD") => away_red += 1,
            _ => {}
        }
    }

    let details = MatchDetailsRecord {
        match_id,
        home_formation: m.home_team.formation.clone(),
        away_formation: m.away_team.formation.clone(),
        home_coach_name: m.home_team.coach.as_ref().and_then(|c| c.name.clone()),
        away_coach_name: m.away_team.coach.as_ref().and_then(|c| c.name.clone()),
        home_goal_count: home_goals,
        away_goal_count: away_goals,
        home_yellow_cards: home_yellow,
        away_yellow_cards: away_yellow,
        home_red_cards: home_red,
        away_red_cards: away_red,
        details_json: raw.map(|v| v.to_string()),
    };

    (details, goals)
}
