use minishop_db::{
    models::{
        member::{Member, TeamAgeSummary},
        team::Team,
    },
    repository::{MemberRepository, TeamRepository},
};
use tracing::debug;

use crate::{database::Database, ShopResult};

/// Creates a team and returns its id.
pub fn create_team(db: &Database, name: &str) -> ShopResult<i32> {
    let id = db.with_conn(|conn| TeamRepository::insert(conn, name))?;
    debug!(team_id = id, name, "team created");
    Ok(id)
}

pub fn list_teams_with_members(db: &Database) -> ShopResult<Vec<(Team, Vec<Member>)>> {
    db.with_conn(TeamRepository::list_with_members)
}

/// Average member age per team.
pub fn team_age_summary(db: &Database) -> ShopResult<Vec<TeamAgeSummary>> {
    db.with_conn(MemberRepository::average_age_by_team)
}
