//! `SeaORM` Entity prelude

pub use super::leagues::Entity as Leagues;
pub use super::match_details::Entity as MatchDetails;
pub use super::match_goals::Entity as MatchGoals;
pub use super::matches::Entity as Matches;
pub use super::scorers::Entity as Scorers;
pub use super::sporttery_matches::Entity as SportteryMatches;
pub use super::standings::Entity as Standings;
pub use super::sync_logs::Entity as SyncLogs;
pub use super::team_coaches::Entity as TeamCoaches;
pub use super::team_squads::Entity as TeamSquads;
pub use super::teams::Entity as Teams;
