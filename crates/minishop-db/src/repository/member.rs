//! Member queries: lookups, sorting, aggregation, joins, subqueries,
//! projections, bulk updates and the paginated condition search.

use diesel::{
    dsl::{count_star, max, min, sql, sum, IntoBoxed, LeftJoin},
    prelude::*,
    sql_types::{Bool, Double, Integer, Nullable, Text},
    sqlite::Sqlite,
};
use tracing::{debug, trace};

use crate::{
    models::{
        member::{Member, MemberDto, MemberStatistics, MemberTeamDto, NewMember, TeamAgeSummary},
        team::Team,
    },
    query::{
        condition::{MemberPredicate, MemberSearchCondition},
        page::{resolve_total, CountStrategy, Page, Pageable},
    },
    schema::{members, teams},
};

type MemberTeamQuery<'a> = IntoBoxed<'a, LeftJoin<members::table, teams::table>, Sqlite>;

/// Repository for member operations.
pub struct MemberRepository;

impl MemberRepository {
    /// Inserts a member and returns its id.
    pub fn insert(conn: &mut SqliteConnection, member: &NewMember) -> QueryResult<i32> {
        diesel::insert_into(members::table)
            .values(member)
            .returning(members::id)
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Member>> {
        members::table
            .filter(members::id.eq(id))
            .select(Member::as_select())
            .first(conn)
            .optional()
    }

    /// Fetches exactly one member by username. A missing row is reported as
    /// [`diesel::result::Error::NotFound`].
    pub fn find_by_username(conn: &mut SqliteConnection, username: &str) -> QueryResult<Member> {
        members::table
            .filter(members::username.eq(username))
            .select(Member::as_select())
            .first(conn)
    }

    pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<Member>> {
        members::table
            .order(members::id.asc())
            .select(Member::as_select())
            .load(conn)
    }

    pub fn find_first(conn: &mut SqliteConnection) -> QueryResult<Option<Member>> {
        members::table
            .order(members::id.asc())
            .select(Member::as_select())
            .first(conn)
            .optional()
    }

    /// Members ordered by age descending, then username ascending with
    /// members without a username last.
    pub fn list_sorted_by_age(conn: &mut SqliteConnection) -> QueryResult<Vec<Member>> {
        members::table
            .order((
                members::age.desc(),
                members::username.is_null(),
                members::username.asc(),
            ))
            .select(Member::as_select())
            .load(conn)
    }

    /// Plain offset/limit slice ordered by username descending.
    pub fn page_by_username_desc(
        conn: &mut SqliteConnection,
        offset: i64,
        limit: i64,
    ) -> QueryResult<Vec<Member>> {
        members::table
            .order(members::username.desc())
            .offset(offset)
            .limit(limit)
            .select(Member::as_select())
            .load(conn)
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        members::table.count().get_result(conn)
    }

    /// Count, sum, average, maximum and minimum of all member ages.
    pub fn statistics(conn: &mut SqliteConnection) -> QueryResult<MemberStatistics> {
        members::table
            .select((
                count_star(),
                sum(members::age),
                sql::<Nullable<Double>>("AVG(members.age)"),
                max(members::age),
                min(members::age),
            ))
            .get_result(conn)
    }

    /// Average member age per team, ordered by team name. Teams without
    /// members are not listed.
    pub fn average_age_by_team(conn: &mut SqliteConnection) -> QueryResult<Vec<TeamAgeSummary>> {
        members::table
            .inner_join(teams::table)
            .group_by(teams::name)
            .select((teams::name, sql::<Nullable<Double>>("AVG(members.age)")))
            .order(teams::name.asc())
            .load(conn)
    }

    /// Members of the team called `team_name`.
    pub fn find_by_team_name(
        conn: &mut SqliteConnection,
        team_name: &str,
    ) -> QueryResult<Vec<Member>> {
        members::table
            .inner_join(teams::table)
            .filter(teams::name.eq(team_name))
            .order(members::id.asc())
            .select(Member::as_select())
            .load(conn)
    }

    /// Every member, paired with its team only when that team is called
    /// `team_name`.
    pub fn list_with_team_named(
        conn: &mut SqliteConnection,
        team_name: &str,
    ) -> QueryResult<Vec<(Member, Option<Team>)>> {
        members::table
            .left_join(
                teams::table.on(members::team_id
                    .assume_not_null()
                    .eq(teams::id)
                    .and(teams::name.eq(team_name))),
            )
            .order(members::id.asc())
            .select((Member::as_select(), Option::<Team>::as_select()))
            .load(conn)
    }

    /// Members whose username equals the name of some team, regardless of
    /// membership.
    pub fn find_named_after_team(conn: &mut SqliteConnection) -> QueryResult<Vec<(Member, Team)>> {
        members::table
            .inner_join(teams::table.on(members::username.assume_not_null().eq(teams::name)))
            .order(members::id.asc())
            .select((Member::as_select(), Team::as_select()))
            .load(conn)
    }

    pub fn find_oldest(conn: &mut SqliteConnection) -> QueryResult<Vec<Member>> {
        members::table
            .filter(sql::<Bool>(
                "members.age = (SELECT MAX(m.age) FROM members m)",
            ))
            .order(members::id.asc())
            .select(Member::as_select())
            .load(conn)
    }

    pub fn find_at_or_above_average_age(conn: &mut SqliteConnection) -> QueryResult<Vec<Member>> {
        members::table
            .filter(sql::<Bool>(
                "members.age >= (SELECT AVG(m.age) FROM members m)",
            ))
            .order(members::id.asc())
            .select(Member::as_select())
            .load(conn)
    }

    /// Members whose age appears among the ages strictly greater than `bound`.
    pub fn find_with_age_in_older_than(
        conn: &mut SqliteConnection,
        bound: i32,
    ) -> QueryResult<Vec<Member>> {
        members::table
            .filter(
                sql::<Bool>("members.age IN (SELECT m.age FROM members m WHERE m.age > ")
                    .bind::<Integer, _>(bound)
                    .sql(")"),
            )
            .order(members::id.asc())
            .select(Member::as_select())
            .load(conn)
    }

    /// Labels each member with an age bracket.
    pub fn age_brackets(conn: &mut SqliteConnection) -> QueryResult<Vec<(Option<String>, String)>> {
        members::table
            .order(members::id.asc())
            .select((
                members::username,
                sql::<Text>(
                    "CASE WHEN members.age BETWEEN 0 AND 20 THEN '0-20' \
                     WHEN members.age BETWEEN 21 AND 30 THEN '21-30' \
                     ELSE 'other' END",
                ),
            ))
            .load(conn)
    }

    /// `username_age` for the member called `username`.
    pub fn username_with_age(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> QueryResult<Option<String>> {
        members::table
            .filter(members::username.eq(username))
            .select(sql::<Nullable<Text>>(
                "members.username || '_' || members.age",
            ))
            .first::<Option<String>>(conn)
            .optional()
            .map(Option::flatten)
    }

    pub fn list_dtos(conn: &mut SqliteConnection) -> QueryResult<Vec<MemberDto>> {
        members::table
            .order(members::id.asc())
            .select((members::username, members::age))
            .load(conn)
    }

    /// Renames every member younger than `age`. Returns the number of rows
    /// changed.
    pub fn rename_younger_than(
        conn: &mut SqliteConnection,
        age: i32,
        username: &str,
    ) -> QueryResult<usize> {
        let updated = diesel::update(members::table.filter(members::age.lt(age)))
            .set(members::username.eq(username))
            .execute(conn)?;
        debug!(age, username, updated, "renamed members");
        Ok(updated)
    }

    pub fn add_to_all_ages(conn: &mut SqliteConnection, delta: i32) -> QueryResult<usize> {
        diesel::update(members::table)
            .set(members::age.eq(members::age + delta))
            .execute(conn)
    }

    /// Deletes every member younger than `age`. Members still referenced by
    /// orders make the statement fail with a foreign key violation.
    pub fn delete_younger_than(conn: &mut SqliteConnection, age: i32) -> QueryResult<usize> {
        let deleted = diesel::delete(members::table.filter(members::age.lt(age))).execute(conn)?;
        debug!(age, deleted, "deleted members");
        Ok(deleted)
    }

    fn filtered<'a>(condition: &MemberSearchCondition) -> MemberTeamQuery<'a> {
        condition.predicates().into_iter().fold(
            members::table.left_join(teams::table).into_boxed(),
            |query, predicate| {
                trace!(?predicate, "applying member predicate");
                match predicate {
                    MemberPredicate::UsernameEq(username) => {
                        query.filter(members::username.eq(username))
                    }
                    MemberPredicate::TeamNameEq(team_name) => query.filter(teams::name.eq(team_name)),
                    MemberPredicate::AgeGoe(age) => query.filter(members::age.ge(age)),
                    MemberPredicate::AgeLoe(age) => query.filter(members::age.le(age)),
                }
            },
        )
    }

    /// All members matching `condition` with their team, ordered by id.
    pub fn search(
        conn: &mut SqliteConnection,
        condition: &MemberSearchCondition,
    ) -> QueryResult<Vec<MemberTeamDto>> {
        Self::filtered(condition)
            .select((
                members::id,
                members::username,
                members::age,
                teams::id.nullable(),
                teams::name.nullable(),
            ))
            .order(members::id.asc())
            .load(conn)
    }

    /// Number of members matching `condition`.
    pub fn count_matching(
        conn: &mut SqliteConnection,
        condition: &MemberSearchCondition,
    ) -> QueryResult<i64> {
        Self::filtered(condition).count().get_result(conn)
    }

    /// One page of members matching `condition`, ordered by id, together with
    /// the total number of matches.
    pub fn search_page(
        conn: &mut SqliteConnection,
        condition: &MemberSearchCondition,
        pageable: &Pageable,
        strategy: CountStrategy,
    ) -> QueryResult<Page<MemberTeamDto>> {
        let content: Vec<MemberTeamDto> = Self::filtered(condition)
            .select((
                members::id,
                members::username,
                members::age,
                teams::id.nullable(),
                teams::name.nullable(),
            ))
            .order(members::id.asc())
            .offset(pageable.offset())
            .limit(pageable.page_size())
            .load(conn)?;

        let total = resolve_total(pageable, content.len(), strategy, || {
            Self::count_matching(conn, condition)
        })?;

        debug!(
            offset = pageable.offset(),
            page_size = pageable.page_size(),
            fetched = content.len(),
            total,
            ?strategy,
            "member search page"
        );

        Ok(Page::new(content, total, *pageable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seeded, usernames};

    fn names(members: &[Member]) -> Vec<String> {
        usernames(members.iter().map(|m| &m.username))
    }

    fn dto_names(rows: &[MemberTeamDto]) -> Vec<String> {
        usernames(rows.iter().map(|m| &m.username))
    }

    fn condition() -> MemberSearchCondition {
        MemberSearchCondition::default()
    }

    #[test]
    fn test_find_by_username() {
        let (mut db, fixture) = seeded();

        let member = MemberRepository::find_by_username(db.conn(), "member1").unwrap();
        assert_eq!(member.age, 10);
        assert_eq!(member.team_id, Some(fixture.team_a));

        let missing = MemberRepository::find_by_username(db.conn(), "nobody");
        assert!(matches!(missing, Err(diesel::result::Error::NotFound)));
    }

    #[test]
    fn test_sorted_by_age_puts_null_usernames_last() {
        let (mut db, _) = seeded();
        let conn = db.conn();
        for username in [None, Some("member5"), Some("member6")] {
            MemberRepository::insert(
                conn,
                &NewMember {
                    username,
                    age: 100,
                    team_id: None,
                },
            )
            .unwrap();
        }

        let sorted = MemberRepository::list_sorted_by_age(conn).unwrap();
        let heads: Vec<Option<&str>> = sorted[..3].iter().map(|m| m.username.as_deref()).collect();
        assert_eq!(heads, vec![Some("member5"), Some("member6"), None]);
        assert_eq!(sorted[3].username.as_deref(), Some("member4"));
    }

    #[test]
    fn test_page_by_username_desc() {
        let (mut db, _) = seeded();

        let page = MemberRepository::page_by_username_desc(db.conn(), 1, 2).unwrap();
        assert_eq!(names(&page), vec!["member3", "member2"]);
    }

    #[test]
    fn test_statistics() {
        let (mut db, _) = seeded();

        let stats = MemberRepository::statistics(db.conn()).unwrap();
        assert_eq!(
            stats,
            MemberStatistics {
                count: 4,
                sum: Some(100),
                avg: Some(25.0),
                max: Some(40),
                min: Some(10),
            }
        );
    }

    #[test]
    fn test_statistics_on_empty_table() {
        let mut db = crate::connection::DbConnection::open_in_memory().unwrap();

        let stats = MemberRepository::statistics(db.conn()).unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg, None);
        assert_eq!(stats.max, None);
    }

    #[test]
    fn test_average_age_by_team() {
        let (mut db, _) = seeded();

        let summary = MemberRepository::average_age_by_team(db.conn()).unwrap();
        assert_eq!(
            summary,
            vec![
                TeamAgeSummary {
                    team_name: "teamA".into(),
                    avg_age: Some(15.0)
                },
                TeamAgeSummary {
                    team_name: "teamB".into(),
                    avg_age: Some(35.0)
                },
            ]
        );
    }

    #[test]
    fn test_joins() {
        let (mut db, fixture) = seeded();
        let conn = db.conn();

        let team_a = MemberRepository::find_by_team_name(conn, "teamA").unwrap();
        assert_eq!(names(&team_a), vec!["member1", "member2"]);

        let rows = MemberRepository::list_with_team_named(conn, "teamA").unwrap();
        assert_eq!(rows.len(), 4);
        let teams: Vec<Option<i32>> = rows.iter().map(|(_, t)| t.as_ref().map(|t| t.id)).collect();
        assert_eq!(
            teams,
            vec![Some(fixture.team_a), Some(fixture.team_a), None, None]
        );

        for username in ["teamA", "teamB", "teamC"] {
            MemberRepository::insert(
                conn,
                &NewMember {
                    username: Some(username),
                    age: 1,
                    team_id: None,
                },
            )
            .unwrap();
        }
        let named = MemberRepository::find_named_after_team(conn).unwrap();
        let pairs: Vec<(Option<String>, String)> = named
            .into_iter()
            .map(|(m, t)| (m.username, t.name))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Some("teamA".into()), "teamA".into()),
                (Some("teamB".into()), "teamB".into()),
            ]
        );
    }

    #[test]
    fn test_subqueries() {
        let (mut db, _) = seeded();
        let conn = db.conn();

        assert_eq!(names(&MemberRepository::find_oldest(conn).unwrap()), vec!["member4"]);
        assert_eq!(
            names(&MemberRepository::find_at_or_above_average_age(conn).unwrap()),
            vec!["member3", "member4"]
        );
        assert_eq!(
            names(&MemberRepository::find_with_age_in_older_than(conn, 10).unwrap()),
            vec!["member2", "member3", "member4"]
        );
    }

    #[test]
    fn test_projections() {
        let (mut db, _) = seeded();
        let conn = db.conn();

        let brackets: Vec<String> = MemberRepository::age_brackets(conn)
            .unwrap()
            .into_iter()
            .map(|(_, label)| label)
            .collect();
        assert_eq!(brackets, vec!["0-20", "0-20", "21-30", "other"]);

        assert_eq!(
            MemberRepository::username_with_age(conn, "member1").unwrap(),
            Some("member1_10".to_string())
        );
        assert_eq!(MemberRepository::username_with_age(conn, "nobody").unwrap(), None);

        let dtos = MemberRepository::list_dtos(conn).unwrap();
        assert_eq!(
            dtos[0],
            MemberDto {
                username: Some("member1".into()),
                age: 10
            }
        );
    }

    #[test]
    fn test_bulk_update_and_delete() {
        let (mut db, _) = seeded();
        let conn = db.conn();

        assert_eq!(MemberRepository::rename_younger_than(conn, 28, "guest").unwrap(), 2);
        let all = MemberRepository::list_all(conn).unwrap();
        assert_eq!(names(&all), vec!["guest", "guest", "member3", "member4"]);

        assert_eq!(MemberRepository::add_to_all_ages(conn, 1).unwrap(), 4);
        assert_eq!(MemberRepository::find_by_username(conn, "member4").unwrap().age, 41);

        assert_eq!(MemberRepository::delete_younger_than(conn, 25).unwrap(), 2);
        assert_eq!(MemberRepository::count(conn).unwrap(), 2);
    }

    #[test]
    fn test_search_empty_condition_matches_all() {
        let (mut db, _) = seeded();

        let rows = MemberRepository::search(db.conn(), &condition()).unwrap();
        assert_eq!(dto_names(&rows), vec!["member1", "member2", "member3", "member4"]);
    }

    #[test]
    fn test_search_single_fields() {
        let (mut db, fixture) = seeded();
        let conn = db.conn();

        let by_team = MemberRepository::search(
            conn,
            &MemberSearchCondition {
                team_name: Some("teamA".into()),
                ..condition()
            },
        )
        .unwrap();
        assert_eq!(dto_names(&by_team), vec!["member1", "member2"]);
        assert!(by_team.iter().all(|r| r.team_id == Some(fixture.team_a)));

        let by_age = MemberRepository::search(
            conn,
            &MemberSearchCondition {
                age_goe: Some(25),
                ..condition()
            },
        )
        .unwrap();
        assert_eq!(dto_names(&by_age), vec!["member3", "member4"]);

        let by_name = MemberRepository::search(
            conn,
            &MemberSearchCondition {
                username: Some("member2".into()),
                ..condition()
            },
        )
        .unwrap();
        assert_eq!(dto_names(&by_name), vec!["member2"]);
    }

    #[test]
    fn test_search_combined_fields_and_teamless_members() {
        let (mut db, _) = seeded();
        let conn = db.conn();
        MemberRepository::insert(
            conn,
            &NewMember {
                username: Some("loner"),
                age: 35,
                team_id: None,
            },
        )
        .unwrap();

        let rows = MemberRepository::search(
            conn,
            &MemberSearchCondition {
                age_goe: Some(30),
                age_loe: Some(35),
                ..condition()
            },
        )
        .unwrap();
        assert_eq!(dto_names(&rows), vec!["member3", "loner"]);
        assert_eq!(rows[1].team_name, None);

        let with_team = MemberRepository::search(
            conn,
            &MemberSearchCondition {
                team_name: Some("teamB".into()),
                age_goe: Some(30),
                age_loe: Some(35),
                ..condition()
            },
        )
        .unwrap();
        assert_eq!(dto_names(&with_team), vec!["member3"]);
    }

    #[test]
    fn test_search_page_reassembles_full_result() {
        let (mut db, _) = seeded();
        let conn = db.conn();
        let cond = condition();
        let full = MemberRepository::search(conn, &cond).unwrap();

        for size in 1..=5 {
            let mut collected = Vec::new();
            let mut pageable = Pageable::new(0, size).unwrap();
            loop {
                let page =
                    MemberRepository::search_page(conn, &cond, &pageable, CountStrategy::Optimized)
                        .unwrap();
                assert_eq!(page.total_elements, 4);
                if page.is_empty() {
                    break;
                }
                collected.extend(page.content);
                pageable = pageable.next();
            }
            assert_eq!(collected, full);
        }
    }

    #[test]
    fn test_search_page_strategies_agree() {
        let (mut db, _) = seeded();
        let conn = db.conn();
        let conditions = [
            condition(),
            MemberSearchCondition {
                team_name: Some("teamA".into()),
                ..condition()
            },
            MemberSearchCondition {
                age_goe: Some(25),
                ..condition()
            },
            MemberSearchCondition {
                username: Some("nobody".into()),
                ..condition()
            },
        ];

        for cond in &conditions {
            for offset in 0..6 {
                for size in 1..4 {
                    let pageable = Pageable::new(offset, size).unwrap();
                    let simple =
                        MemberRepository::search_page(conn, cond, &pageable, CountStrategy::Simple)
                            .unwrap();
                    let optimized = MemberRepository::search_page(
                        conn,
                        cond,
                        &pageable,
                        CountStrategy::Optimized,
                    )
                    .unwrap();
                    assert_eq!(simple, optimized, "{cond:?} offset={offset} size={size}");
                }
            }
        }
    }

    #[test]
    fn test_search_page_is_repeatable() {
        let (mut db, _) = seeded();
        let conn = db.conn();
        let cond = MemberSearchCondition {
            age_loe: Some(30),
            ..condition()
        };
        let pageable = Pageable::new(1, 2).unwrap();

        let first =
            MemberRepository::search_page(conn, &cond, &pageable, CountStrategy::Optimized).unwrap();
        let second =
            MemberRepository::search_page(conn, &cond, &pageable, CountStrategy::Optimized).unwrap();

        assert_eq!(first, second);
        assert_eq!(dto_names(&first.content), vec!["member2", "member3"]);
        assert_eq!(first.total_elements, 3);
    }
}
