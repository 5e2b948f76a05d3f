//! Sample dataset used for demos and tests.

use minishop_db::{
    models::{item::NewItem, member::NewMember},
    repository::{ItemRepository, MemberRepository, TeamRepository},
};
use serde::Serialize;
use tracing::debug;

use crate::{database::Database, error::ShopError, ShopResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub teams: usize,
    pub members: usize,
    pub items: usize,
}

/// Inserts teams teamA and teamB, member1..member4 aged 10 to 40 (the first
/// two in teamA), two books and one movie.
///
/// Fails when teamA already exists.
pub fn seed_sample_data(db: &Database) -> ShopResult<SeedSummary> {
    db.transaction(|conn| {
        if TeamRepository::find_by_name(conn, "teamA")?.is_some() {
            return Err(ShopError::Custom(
                "Sample data is already present".to_string(),
            ));
        }

        let team_a = TeamRepository::insert(conn, "teamA")?;
        let team_b = TeamRepository::insert(conn, "teamB")?;

        let members = [
            ("member1", 10, team_a),
            ("member2", 20, team_a),
            ("member3", 30, team_b),
            ("member4", 40, team_b),
        ];
        for (username, age, team_id) in members {
            let id = MemberRepository::insert(
                conn,
                &NewMember {
                    username: Some(username),
                    age,
                    team_id: Some(team_id),
                },
            )?;
            debug!(member_id = id, username, "seeded member");
        }

        let items = [
            NewItem::book("JPA1 BOOK", 10_000, 100, Some("kim"), Some("1111")),
            NewItem::book("JPA2 BOOK", 20_000, 100, Some("kim"), Some("2222")),
            NewItem::movie("SPRING MOVIE", 15_000, 50, Some("lee"), None),
        ];
        for item in &items {
            ItemRepository::insert(conn, item)?;
        }

        let summary = SeedSummary {
            teams: 2,
            members: members.len(),
            items: items.len(),
        };
        debug!(
            teams = summary.teams,
            members = summary.members,
            items = summary.items,
            "sample data inserted"
        );
        Ok(summary)
    })
}
