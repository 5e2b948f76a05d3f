use crate::{
    connection::DbConnection,
    models::{item::NewItem, member::NewMember},
    repository::{ItemRepository, MemberRepository, TeamRepository},
};

/// Ids of the rows inserted by [`seeded`].
pub struct Fixture {
    pub team_a: i32,
    pub team_b: i32,
    pub members: [i32; 4],
    pub book: i32,
    pub movie: i32,
}

/// In-memory database with teamA (member1, member2), teamB (member3,
/// member4) aged 10/20/30/40, one book with 10 units and one movie with 5.
pub fn seeded() -> (DbConnection, Fixture) {
    let mut db = DbConnection::open_in_memory().unwrap();
    let conn = db.conn();

    let team_a = TeamRepository::insert(conn, "teamA").unwrap();
    let team_b = TeamRepository::insert(conn, "teamB").unwrap();

    let mut members = [0; 4];
    for (i, id) in members.iter_mut().enumerate() {
        let username = format!("member{}", i + 1);
        *id = MemberRepository::insert(
            conn,
            &NewMember {
                username: Some(&username),
                age: (i as i32 + 1) * 10,
                team_id: Some(if i < 2 { team_a } else { team_b }),
            },
        )
        .unwrap();
    }

    let book = ItemRepository::insert(
        conn,
        &NewItem::book("JPA", 10_000, 10, Some("kim"), Some("1234")),
    )
    .unwrap();
    let movie = ItemRepository::insert(
        conn,
        &NewItem::movie("Spring", 20_000, 5, Some("lee"), None),
    )
    .unwrap();

    (
        db,
        Fixture {
            team_a,
            team_b,
            members,
            book,
            movie,
        },
    )
}

pub fn usernames<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Option<String>>,
{
    names.into_iter().filter_map(Clone::clone).collect()
}
