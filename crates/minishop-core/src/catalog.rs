use minishop_db::{
    models::{
        item::{Item, NewItem},
        types::ItemType,
    },
    repository::ItemRepository,
};
use tracing::debug;

use crate::{database::Database, error::ShopError, ShopResult};

pub fn add_book(
    db: &Database,
    name: &str,
    price: i32,
    stock_quantity: i32,
    author: Option<&str>,
    isbn: Option<&str>,
) -> ShopResult<i32> {
    let item = NewItem::book(name, price, stock_quantity, author, isbn);
    let id = db.with_conn(|conn| ItemRepository::insert(conn, &item))?;
    debug!(item_id = id, name, "book added");
    Ok(id)
}

pub fn add_movie(
    db: &Database,
    name: &str,
    price: i32,
    stock_quantity: i32,
    artist: Option<&str>,
    etc: Option<&str>,
) -> ShopResult<i32> {
    let item = NewItem::movie(name, price, stock_quantity, artist, etc);
    let id = db.with_conn(|conn| ItemRepository::insert(conn, &item))?;
    debug!(item_id = id, name, "movie added");
    Ok(id)
}

pub fn find_item(db: &Database, id: i32) -> ShopResult<Item> {
    db.with_conn(|conn| ItemRepository::find_by_id(conn, id))?
        .ok_or(ShopError::ItemNotFound(id))
}

/// Lists the catalog, optionally only one kind of item.
pub fn list_items(db: &Database, item_type: Option<ItemType>) -> ShopResult<Vec<Item>> {
    db.with_conn(|conn| ItemRepository::list(conn, item_type))
}
