use diesel::prelude::*;
use tracing::debug;

use crate::{
    models::{
        item::{Item, ItemRecord, NewItem},
        types::ItemType,
    },
    schema::items,
};

/// Repository for catalog items.
pub struct ItemRepository;

impl ItemRepository {
    /// Inserts an item and returns its id.
    pub fn insert(conn: &mut SqliteConnection, item: &NewItem) -> QueryResult<i32> {
        diesel::insert_into(items::table)
            .values(item)
            .returning(items::id)
            .get_result(conn)
    }

    pub fn find_by_id(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Item>> {
        let record = items::table
            .filter(items::id.eq(id))
            .select(ItemRecord::as_select())
            .first(conn)
            .optional()?;

        Ok(record.map(Item::from))
    }

    /// Lists items ordered by id, optionally restricted to one kind.
    pub fn list(conn: &mut SqliteConnection, item_type: Option<ItemType>) -> QueryResult<Vec<Item>> {
        let mut query = items::table.into_boxed();

        if let Some(item_type) = item_type {
            query = query.filter(items::dtype.eq(item_type));
        }

        let records: Vec<ItemRecord> = query
            .order(items::id.asc())
            .select(ItemRecord::as_select())
            .load(conn)?;

        Ok(records.into_iter().map(Item::from).collect())
    }

    /// Removes `quantity` units from stock. Returns `false` without changing
    /// anything when fewer units are available.
    pub fn decrease_stock(
        conn: &mut SqliteConnection,
        id: i32,
        quantity: i32,
    ) -> QueryResult<bool> {
        let updated = diesel::update(
            items::table
                .filter(items::id.eq(id))
                .filter(items::stock_quantity.ge(quantity)),
        )
        .set(items::stock_quantity.eq(items::stock_quantity - quantity))
        .execute(conn)?;

        debug!(item_id = id, quantity, updated, "decrease stock");
        Ok(updated == 1)
    }

    pub fn increase_stock(conn: &mut SqliteConnection, id: i32, quantity: i32) -> QueryResult<usize> {
        diesel::update(items::table.filter(items::id.eq(id)))
            .set(items::stock_quantity.eq(items::stock_quantity + quantity))
            .execute(conn)
    }
}

#[cfg(test)]
mod tests {
    use diesel::sql_query;

    use super::*;
    use crate::{error::DbError, models::item::ItemKind, test_utils::seeded};

    #[test]
    fn test_discriminator_maps_to_kind() {
        let (mut db, fixture) = seeded();

        let book = ItemRepository::find_by_id(db.conn(), fixture.book).unwrap().unwrap();
        assert_eq!(
            book.kind,
            ItemKind::Book {
                author: Some("kim".into()),
                isbn: Some("1234".into())
            }
        );

        let movie = ItemRepository::find_by_id(db.conn(), fixture.movie).unwrap().unwrap();
        assert_eq!(movie.kind.item_type(), ItemType::Movie);
        assert_eq!(movie.price, 20_000);
    }

    #[test]
    fn test_list_by_type() {
        let (mut db, fixture) = seeded();
        let conn = db.conn();

        assert_eq!(ItemRepository::list(conn, None).unwrap().len(), 2);
        let books = ItemRepository::list(conn, Some(ItemType::Book)).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, fixture.book);
    }

    #[test]
    fn test_decrease_stock_is_guarded() {
        let (mut db, fixture) = seeded();
        let conn = db.conn();

        assert!(ItemRepository::decrease_stock(conn, fixture.movie, 5).unwrap());
        assert!(!ItemRepository::decrease_stock(conn, fixture.movie, 1).unwrap());

        ItemRepository::increase_stock(conn, fixture.movie, 3).unwrap();
        let movie = ItemRepository::find_by_id(conn, fixture.movie).unwrap().unwrap();
        assert_eq!(movie.stock_quantity, 3);
    }

    #[test]
    fn test_unknown_discriminator_fails_to_load() {
        let (mut db, _) = seeded();
        let conn = db.conn();
        sql_query("PRAGMA ignore_check_constraints = ON").execute(conn).unwrap();
        sql_query(
            "INSERT INTO items (id, dtype, name, price, stock_quantity) VALUES (99, 'A', 'Album', 1, 1)",
        )
        .execute(conn)
        .unwrap();

        let err = ItemRepository::find_by_id(conn, 99).unwrap_err();
        assert!(matches!(DbError::from(err), DbError::QueryError(_)));
    }
}
