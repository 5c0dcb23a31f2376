//! football-data.org sync routines.
//!
//! Each routine walks the monitored leagues (or stored teams and matches), maps upstream
//! payloads into records and saves them. The count returned is the number of saves that
//! succeeded.

use chrono::{Datelike, Utc};
use std::sync::Arc;

use crate::error::SyncError;
use crate::models::football_data::{
    match_details_from_api, CoachRecord, LeagueRecord, MatchRecord, ScorerRecord,
    SquadPlayerRecord, StandingRecord, TeamRecord, STANDINGS_TOTAL,
};
use crate::services::football_data::FdMatch;
use crate::services::football_data_store::UPCOMING_STATUSES;
use crate::SyncContext;

const RESULTS_LIMIT: u32 = 100;
const SCORERS_LIMIT: u32 = 100;
const TEAMS_LIMIT: u32 = 100;
const RECENT_FINISHED_DETAILS: u64 = 10;

async fn save_matches(ctx: &SyncContext, league: &str, matches: &[FdMatch]) -> u64 {
    let mut saved = 0;
    for m in matches {
        let code = m
            .competition
            .as_ref()
            .and_then(|c| c.code.as_deref())
            .unwrap_or(league);

        match MatchRecord::from_api(m, code) {
            Some(record) => {
                if ctx.fd_store.save_match(&record).await {
                    saved += 1;
                }
            }
            None => tracing::warn!("Skipping match {:?} without id, kickoff or status", m.id),
        }
    }
    saved
}

pub async fn sync_scheduled(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut count = 0;
    for league in &ctx.monitored_leagues {
        for status in UPCOMING_STATUSES {
            let matches = ctx.football_data.get_matches(Some(league.as_str()), status, None).await?;
            count += save_matches(&ctx, league, &matches).await;
        }
    }
    Ok(count)
}

pub async fn sync_results(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut count = 0;
    for league in &ctx.monitored_leagues {
        let matches = ctx
            .football_data
            .get_matches(Some(league.as_str()), "FINISHED", Some(RESULTS_LIMIT))
            .await?;
        count += save_matches(&ctx, league, &matches).await;
    }
    Ok(count)
}

pub async fn sync_live_scores(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut matches = ctx.football_data.get_matches(None, "LIVE", None).await?;
    if matches.is_empty() {
        matches = ctx.football_data.get_matches(None, "IN_PLAY", None).await?;
    }

    let monitored: Vec<FdMatch> = matches
        .into_iter()
        .filter(|m| {
            m.competition
                .as_ref()
                .and_then(|c| c.code.as_ref())
                .is_some_and(|code| ctx.monitored_leagues.contains(code))
        })
        .collect();

    if monitored.is_empty() {
        tracing::debug!("No live matches in monitored leagues");
        return Ok(0);
    }

    Ok(save_matches(&ctx, "", &monitored).await)
}

pub async fn sync_standings(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut count = 0;
    for league in &ctx.monitored_leagues {
        let response = ctx.football_data.get_standings(league).await?;
        let season = response.season.as_ref().and_then(|s| s.id);

        let rows = response
            .standings
            .iter()
            .filter(|t| t.kind.as_deref().is_none_or(|kind| kind == STANDINGS_TOTAL))
            .flat_map(|t| t.table.iter());

        for row in rows {
            if let Some(record) = StandingRecord::from_api(league, season, row) {
                if ctx.fd_store.save_standing(&record).await {
                    count += 1;
                }
            }
        }
    }
    Ok(count)
}

pub async fn sync_scorers(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut count = 0;
    for league in &ctx.monitored_leagues {
        let response = ctx
            .football_data
            .get_scorers(league, Some(SCORERS_LIMIT))
            .await?;
        let season = response.season.as_ref().and_then(|s| s.id);

        for (rank, scorer) in response.scorers.iter().enumerate() {
            if let Some(record) = ScorerRecord::from_api(league, season, rank as i32 + 1, scorer) {
                if ctx.fd_store.save_scorer(&record).await {
                    count += 1;
                }
            }
        }
    }
    Ok(count)
}

pub async fn sync_teams(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut count = 0;
    for league in &ctx.monitored_leagues {
        let teams = ctx.football_data.get_teams(league, TEAMS_LIMIT).await?;
        for team in &teams {
            if let Some(record) = TeamRecord::from_api(team) {
                if ctx.fd_store.save_team(&record).await {
                    count += 1;
                }
            }
        }
    }
    Ok(count)
}

pub async fn sync_competitions(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut count = 0;
    for competition in ctx.football_data.get_competitions().await? {
        if let Some(record) = LeagueRecord::from_api(&competition) {
            if ctx.fd_store.save_league(&record).await {
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Coach and squad for every stored team. A failing team is logged and skipped.
pub async fn sync_team_details(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let team_ids = ctx.fd_store.get_all_team_ids().await?;
    let season = Some(Utc::now().year());
    let mut count = 0;

    for team_id in team_ids {
        let team = match ctx.football_data.get_team(team_id).await {
            Ok(Some(team)) => team,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Failed to fetch details for team {}: {}", team_id, e);
                continue;
            }
        };

        if let Some(coach) = &team.coach {
            if ctx.fd_store.save_team_coach(&CoachRecord::from_api(team_id, coach)).await {
                count += 1;
            }
        }

        for player in &team.squad {
            if let Some(record) = SquadPlayerRecord::from_api(team_id, season, player) {
                if ctx.fd_store.save_team_squad(&record).await {
                    count += 1;
                }
            }
        }
    }
    Ok(count)
}

/// Details and goals for live matches, or the most recent finished ones when nothing is live.
pub async fn sync_match_details(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let mut match_ids = ctx
        .fd_store
        .get_match_ids_by_status(&["IN_PLAY", "PAUSED"], None)
        .await?;
    if match_ids.is_empty() {
        match_ids = ctx
            .fd_store
            .get_match_ids_by_status(&["FINISHED"], Some(RECENT_FINISHED_DETAILS))
            .await?;
    }

    let mut count = 0;
    for match_id in match_ids {
        let payload = match ctx.football_data.get_match(match_id).await {
            Ok(Some(payload)) => payload,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Failed to fetch details for match {}: {}", match_id, e);
                continue;
            }
        };

        let (details, goals) = match_details_from_api(match_id, &payload.parsed, Some(&payload.raw));
        // Goal counts on the details row must agree with the stored goals
        if !ctx.fd_store.replace_match_goals(match_id, &goals).await {
            tracing::warn!("Skipping details for match {}: goals were not saved", match_id);
            continue;
        }
        if ctx.fd_store.save_match_details(&details).await {
            count += 1;
        }
    }
    Ok(count)
}
