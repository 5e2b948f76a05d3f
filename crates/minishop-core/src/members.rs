//! Member registration, search and bulk maintenance.

use minishop_db::{
    models::member::{Member, MemberStatistics, MemberTeamDto, NewMember},
    query::{CountStrategy, MemberSearchCondition, Page, Pageable},
    repository::{MemberRepository, TeamRepository},
};
use tracing::debug;

use crate::{database::Database, error::ShopError, ShopResult};

/// Registers a member, optionally in the team called `team_name`.
pub fn register_member(
    db: &Database,
    username: &str,
    age: i32,
    team_name: Option<&str>,
) -> ShopResult<i32> {
    db.transaction(|conn| {
        let team_id = match team_name {
            Some(name) => {
                let team = TeamRepository::find_by_name(conn, name)?
                    .ok_or_else(|| ShopError::TeamNotFound(name.to_string()))?;
                Some(team.id)
            }
            None => None,
        };

        let id = MemberRepository::insert(
            conn,
            &NewMember {
                username: Some(username),
                age,
                team_id,
            },
        )?;
        debug!(member_id = id, username, age, "member registered");
        Ok(id)
    })
}

pub fn find_member(db: &Database, id: i32) -> ShopResult<Member> {
    db.with_conn(|conn| MemberRepository::find_by_id(conn, id))?
        .ok_or(ShopError::MemberNotFound(id))
}

/// Searches members page by page.
///
/// Every present field of `condition` narrows the result; results are
/// ordered by member id.
pub fn search_members(
    db: &Database,
    condition: &MemberSearchCondition,
    pageable: &Pageable,
    strategy: CountStrategy,
) -> ShopResult<Page<MemberTeamDto>> {
    debug!(
        ?condition,
        offset = pageable.offset(),
        page_size = pageable.page_size(),
        "searching members"
    );
    db.with_conn(|conn| MemberRepository::search_page(conn, condition, pageable, strategy))
}

pub fn member_statistics(db: &Database) -> ShopResult<MemberStatistics> {
    db.with_conn(MemberRepository::statistics)
}

/// Gives every member younger than `age` the username `username`.
pub fn rename_younger_than(db: &Database, age: i32, username: &str) -> ShopResult<usize> {
    db.transaction(|conn| Ok(MemberRepository::rename_younger_than(conn, age, username)?))
}

/// Removes every member younger than `age`. Fails without removing anything
/// when one of them has placed an order.
pub fn remove_younger_than(db: &Database, age: i32) -> ShopResult<usize> {
    db.transaction(|conn| Ok(MemberRepository::delete_younger_than(conn, age)?))
}

#[cfg(test)]
mod tests {
    use minishop_db::error::DbError;

    use super::*;
    use crate::{seed::seed_sample_data, teams::create_team};

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        seed_sample_data(&db).unwrap();
        db
    }

    fn usernames(page: &Page<MemberTeamDto>) -> Vec<&str> {
        page.content
            .iter()
            .filter_map(|m| m.username.as_deref())
            .collect()
    }

    #[test]
    fn test_register_member_with_unknown_team() {
        let db = Database::open_in_memory().unwrap();

        let err = register_member(&db, "member1", 10, Some("teamZ")).unwrap_err();
        assert!(matches!(err, ShopError::TeamNotFound(name) if name == "teamZ"));
    }

    #[test]
    fn test_register_and_find() {
        let db = Database::open_in_memory().unwrap();
        let team_id = create_team(&db, "teamA").unwrap();

        let id = register_member(&db, "member1", 10, Some("teamA")).unwrap();
        let member = find_member(&db, id).unwrap();
        assert_eq!(member.team_id, Some(team_id));

        assert!(matches!(
            find_member(&db, id + 1),
            Err(ShopError::MemberNotFound(_))
        ));
    }

    #[test]
    fn test_search_by_team_and_age() {
        let db = seeded();
        let pageable = Pageable::new(0, 20).unwrap();

        let by_team = search_members(
            &db,
            &MemberSearchCondition {
                team_name: Some("teamA".into()),
                ..Default::default()
            },
            &pageable,
            CountStrategy::Optimized,
        )
        .unwrap();
        assert_eq!(usernames(&by_team), vec!["member1", "member2"]);
        assert_eq!(by_team.total_elements, 2);

        let by_age = search_members(
            &db,
            &MemberSearchCondition {
                age_goe: Some(25),
                ..Default::default()
            },
            &pageable,
            CountStrategy::Simple,
        )
        .unwrap();
        assert_eq!(usernames(&by_age), vec!["member3", "member4"]);
        assert_eq!(by_age.total_elements, 2);
    }

    #[test]
    fn test_search_beyond_last_page() {
        let db = seeded();

        let page = search_members(
            &db,
            &MemberSearchCondition::default(),
            &Pageable::new(10, 3).unwrap(),
            CountStrategy::Optimized,
        )
        .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_elements, 4);
        assert!(!page.has_next());
    }

    #[test]
    fn test_statistics_and_bulk_rename() {
        let db = seeded();

        let stats = member_statistics(&db).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.avg, Some(25.0));

        assert_eq!(rename_younger_than(&db, 28, "guest").unwrap(), 2);
        assert_eq!(remove_younger_than(&db, 15).unwrap(), 1);
        assert_eq!(member_statistics(&db).unwrap().count, 3);
    }

    #[test]
    fn test_remove_is_rejected_for_members_with_orders() {
        let db = seeded();
        let member = db
            .with_conn(|conn| MemberRepository::find_by_username(conn, "member1"))
            .unwrap();
        let items = crate::catalog::list_items(&db, None).unwrap();
        crate::orders::place_order(
            &db,
            member.id,
            &[crate::orders::OrderLineRequest {
                item_id: items[0].id,
                quantity: 1,
            }],
            Default::default(),
        )
        .unwrap();

        let err = remove_younger_than(&db, 25).unwrap_err();
        assert!(matches!(
            err,
            ShopError::Database(DbError::ConstraintViolation(_))
        ));
        assert_eq!(member_statistics(&db).unwrap().count, 4);
    }
}
