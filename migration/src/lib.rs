pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_leagues_and_teams;
mod m20260301_000002_create_matches;
mod m20260301_000003_create_standings_and_scorers;
mod m20260301_000004_create_team_coaches_and_squads;
mod m20260301_000005_create_sporttery_matches;
mod m20260301_000006_create_sync_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_leagues_and_teams::Migration),
            Box::new(m20260301_000002_create_matches::Migration),
            Box::new(m20260301_000003_create_standings_and_scorers::Migration),
            Box::new(m20260301_000004_create_team_coaches_and_squads::Migration),
            Box::new(m20260301_000005_create_sporttery_matches::Migration),
            Box::new(m20260301_000006_create_sync_logs::Migration),
        ]
    }
}
