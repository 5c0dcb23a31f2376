mod common;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use serde_json::{json, Value};
use std::sync::Arc;

use matchstats_sync::entities::prelude::{MatchDetails, MatchGoals, Standings};
use matchstats_sync::jobs::{football_data_sync, sporttery_sync};
use matchstats_sync::models::football_data::TeamRecord;
use matchstats_sync::services::football_data_store::ScorerOrder;

fn finished_match(id: i64, goals: usize) -> Value {
    let goal_list: Vec<Value> = (0..goals)
        .map(|i| {
            json!({
                "minute": 10 + i as i32 * 10,
                "type": "REGULAR",
                "team": {"id": 66, "name": "Manchester United FC"},
                "scorer": {"id": 100 + i as i64, "name": format!("Scorer {}", i)}
            })
        })
        .collect();

    json!({
        "id": id,
        "utcDate": "2024-08-16T19:00:00Z",
        "status": "FINISHED",
        "competition": {"code": "PL"},
        "season": {"id": 2287},
        "homeTeam": {"id": 66, "name": "Manchester United FC"},
        "awayTeam": {"id": 63, "name": "Fulham FC"},
        "score": {"fullTime": {"home": goals, "away": 0}, "halfTime": {"home": 0, "away": 0}},
        "referees": [{"name": "Jarred Gillett", "type": "REFEREE"}],
        "goals": goal_list
    })
}

fn football_data_upstream(goals: Arc<parking_lot::Mutex<usize>>) -> Router {
    Router::new()
        .route(
            "/competitions/PL/matches",
            get(|| async {
                Json(json!({"matches": [
                    finished_match(1001, 0),
                    {"id": 1002},
                    {"utcDate": "2024-08-17T14:00:00Z", "status": "FINISHED"}
                ]}))
            }),
        )
        .route(
            "/competitions/PL/standings",
            get(|| async {
                Json(json!({
                    "season": {"id": 2287},
                    "standings": [
                        {"type": "TOTAL", "table": [
                            {"position": 1, "team": {"id": 57, "name": "Arsenal FC"}, "points": 9},
                            {"position": 2, "team": {"id": 65, "name": "Manchester City FC"}, "points": 7}
                        ]},
                        {"type": "HOME", "table": [
                            {"position": 1, "team": {"id": 65, "name": "Manchester City FC"}, "points": 6}
                        ]}
                    ]
                }))
            }),
        )
        .route(
            "/competitions/PL/scorers",
            get(|| async {
                Json(json!({
                    "season": {"id": 2287},
                    "scorers": [
                        {"player": {"id": 38101, "name": "Erling Haaland"},
                         "team": {"id": 65, "name": "Manchester City FC"}, "goals": 7, "assists": null},
                        {"player": {"id": 7, "name": "Cole Palmer"},
                         "team": {"id": 61, "name": "Chelsea FC"}, "goals": 5, "assists": 3}
                    ]
                }))
            }),
        )
        .route(
            "/teams/66",
            get(|| async {
                Json(json!({
                    "id": 66,
                    "name": "Manchester United FC",
                    "coach": {"id": 1, "name": "Erik ten Hag", "dateOfBirth": "1970-02-02",
                              "contract": {"until": "2025-06"}},
                    "squad": [
                        {"id": 10, "name": "Player Ten", "position": "Midfield", "shirtNumber": 10},
                        {"name": "No Id"}
                    ]
                }))
            }),
        )
        .route(
            "/matches/1001",
            get(|State(goals): State<Arc<parking_lot::Mutex<usize>>>| async move {
                let count = *goals.lock();
                Json(finished_match(1001, count))
            }),
        )
        .with_state(goals)
}

#[tokio::test]
async fn test_results_standings_and_scorers_routines() {
    let db = common::setup_test_db().await.unwrap();
    let base = common::spawn_upstream(football_data_upstream(Arc::new(parking_lot::Mutex::new(0)))).await;
    let ctx = common::test_context(db.clone(), &base, &base, &["PL"]);

    // The second match has no kickoff and the third no id; both are skipped
    assert_eq!(football_data_sync::sync_results(ctx.clone()).await.unwrap(), 1);
    let stored = ctx.fd_store.get_match(1001).await.unwrap().unwrap();
    assert_eq!(stored.referee.as_deref(), Some("Jarred Gillett"));
    assert_eq!(stored.home_score, Some(0));

    assert_eq!(football_data_sync::sync_standings(ctx.clone()).await.unwrap(), 2);
    assert_eq!(football_data_sync::sync_standings(ctx.clone()).await.unwrap(), 2);
    assert_eq!(Standings::find().count(&db).await.unwrap(), 2);
    let table = ctx.fd_store.get_standings("PL", Some(2287)).await.unwrap();
    assert_eq!(table[0].team_name, "Arsenal FC");
    assert_eq!(table[1].points, 7);

    assert_eq!(football_data_sync::sync_scorers(ctx.clone()).await.unwrap(), 2);
    let scorers = ctx
        .fd_store
        .get_scorers("PL", Some(2287), ScorerOrder::Goals)
        .await
        .unwrap();
    assert_eq!(scorers[0].player_name, "Erling Haaland");
    assert_eq!(scorers[0].position, 1);
    assert_eq!(scorers[0].assists, 0);
}

#[tokio::test]
async fn test_team_details_skips_failing_teams() {
    let db = common::setup_test_db().await.unwrap();
    let base = common::spawn_upstream(football_data_upstream(Arc::new(parking_lot::Mutex::new(0)))).await;
    let ctx = common::test_context(db, &base, &base, &["PL"]);

    for (fd_id, name) in [(66, "Manchester United FC"), (404, "Missing FC")] {
        let team = TeamRecord {
            fd_id,
            name: name.to_string(),
            short_name: None,
            tla: None,
            crest: None,
            venue: None,
            founded: None,
            club_colors: None,
            website: None,
        };
        assert!(ctx.fd_store.save_team(&team).await);
    }

    // Coach plus one squad player with an id
    assert_eq!(football_data_sync::sync_team_details(ctx.clone()).await.unwrap(), 2);

    let coach = ctx.fd_store.get_team_coach(66).await.unwrap().unwrap();
    assert_eq!(coach.contract_until.as_deref(), Some("2025-06"));
    let squad = ctx.fd_store.get_squad(66, None).await.unwrap();
    assert_eq!(squad.len(), 1);
    assert_eq!(squad[0].shirt_number, Some(10));
}

#[tokio::test]
async fn test_match_details_replaces_goals() {
    let db = common::setup_test_db().await.unwrap();
    let goals = Arc::new(parking_lot::Mutex::new(3));
    let base = common::spawn_upstream(football_data_upstream(goals.clone())).await;
    let ctx = common::test_context(db.clone(), &base, &base, &["PL"]);

    football_data_sync::sync_results(ctx.clone()).await.unwrap();

    assert_eq!(football_data_sync::sync_match_details(ctx.clone()).await.unwrap(), 1);
    assert_eq!(MatchGoals::find().count(&db).await.unwrap(), 3);

    *goals.lock() = 2;
    assert_eq!(football_data_sync::sync_match_details(ctx.clone()).await.unwrap(), 1);
    assert_eq!(MatchGoals::find().count(&db).await.unwrap(), 2);

    let view = ctx.fd_store.get_match_details(1001).await.unwrap().unwrap();
    assert_eq!(view.details.home_goal_count, 2);
    assert_eq!(view.goals.len(), 2);
    assert!(view.goals[0].minute < view.goals[1].minute);
    assert!(view.details.details_json.is_some());
}

#[tokio::test]
async fn test_match_details_not_counted_when_goals_fail() {
    let db = common::setup_test_db().await.unwrap();
    let base = common::spawn_upstream(football_data_upstream(Arc::new(parking_lot::Mutex::new(3)))).await;
    let ctx = common::test_context(db.clone(), &base, &base, &["PL"]);

    football_data_sync::sync_results(ctx.clone()).await.unwrap();
    db.execute_unprepared("DROP TABLE match_goals").await.unwrap();

    assert_eq!(football_data_sync::sync_match_details(ctx.clone()).await.unwrap(), 0);
    assert_eq!(MatchDetails::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sporttery_routine_is_idempotent() {
    let db = common::setup_test_db().await.unwrap();
    let app = Router::new().route(
        "/gateway/uniform/football/getMatchListV1.qry",
        get(|| async {
            Json(json!({
                "success": true,
                "value": {"matchInfoList": [
                    {"businessDate": "2024-08-17", "subMatchList": [
                        {"matchNumStr": "周六001"}, {"matchNumStr": "周六002"}
                    ]}
                ]}
            }))
        }),
    );
    let base = common::spawn_upstream(app).await;
    let ctx = common::test_context(db, &base, &base, &[]);

    assert_eq!(sporttery_sync::sync_matches(ctx.clone()).await.unwrap(), 2);
    assert_eq!(sporttery_sync::sync_matches(ctx.clone()).await.unwrap(), 2);
    assert_eq!(ctx.sporttery_store.count_matches().await.unwrap(), 2);
}
