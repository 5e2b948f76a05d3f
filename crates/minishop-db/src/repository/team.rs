use diesel::prelude::*;

use crate::{
    models::{
        member::Member,
        team::{NewTeam, Team},
    },
    schema::{members, teams},
};

/// Repository for team operations.
pub struct TeamRepository;

impl TeamRepository {
    /// Inserts a team and returns its id.
    pub fn insert(conn: &mut SqliteConnection, name: &str) -> QueryResult<i32> {
        diesel::insert_into(teams::table)
            .values(NewTeam { name })
            .returning(teams::id)
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Team>> {
        teams::table
            .filter(teams::id.eq(id))
            .select(Team::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_name(conn: &mut SqliteConnection, name: &str) -> QueryResult<Option<Team>> {
        teams::table
            .filter(teams::name.eq(name))
            .select(Team::as_select())
            .first(conn)
            .optional()
    }

    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Team>> {
        teams::table
            .order(teams::id.asc())
            .select(Team::as_select())
            .load(conn)
    }

    /// Lists every team with its members, both ordered by id.
    pub fn list_with_members(conn: &mut SqliteConnection) -> QueryResult<Vec<(Team, Vec<Member>)>> {
        let teams = Self::list_all(conn)?;

        let members = Member::belonging_to(&teams)
            .order(members::id.asc())
            .select(Member::as_select())
            .load(conn)?;

        Ok(members
            .grouped_by(&teams)
            .into_iter()
            .zip(teams)
            .map(|(members, team)| (team, members))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::DbError, test_utils::seeded};

    #[test]
    fn test_find_by_name() {
        let (mut db, fixture) = seeded();

        let team = TeamRepository::find_by_name(db.conn(), "teamB").unwrap().unwrap();
        assert_eq!(team.id, fixture.team_b);
        assert!(TeamRepository::find_by_name(db.conn(), "teamZ").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_is_a_constraint_violation() {
        let (mut db, _) = seeded();

        let err = TeamRepository::insert(db.conn(), "teamA").unwrap_err();
        assert!(matches!(DbError::from(err), DbError::ConstraintViolation(_)));
    }

    #[test]
    fn test_list_with_members_groups_by_team() {
        let (mut db, fixture) = seeded();
        TeamRepository::insert(db.conn(), "empty").unwrap();

        let grouped = TeamRepository::list_with_members(db.conn()).unwrap();
        let summary: Vec<(String, Vec<i32>)> = grouped
            .into_iter()
            .map(|(team, members)| (team.name, members.into_iter().map(|m| m.id).collect()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("teamA".to_string(), fixture.members[..2].to_vec()),
                ("teamB".to_string(), fixture.members[2..].to_vec()),
                ("empty".to_string(), vec![]),
            ]
        );
    }
}
