use diesel::prelude::*;
use serde::Serialize;

use crate::{models::types::ItemType, schema::items};

/// Flat row of the `items` table. The `dtype` column decides which of the
/// kind specific columns are meaningful.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemRecord {
    pub id: i32,
    pub dtype: ItemType,
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub artist: Option<String>,
    pub etc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Book {
        author: Option<String>,
        isbn: Option<String>,
    },
    Movie {
        artist: Option<String>,
        etc: Option<String>,
    },
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Book { .. } => ItemType::Book,
            ItemKind::Movie { .. } => ItemType::Movie,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let kind = match record.dtype {
            ItemType::Book => ItemKind::Book {
                author: record.author,
                isbn: record.isbn,
            },
            ItemType::Movie => ItemKind::Movie {
                artist: record.artist,
                etc: record.etc,
            },
        };

        Self {
            id: record.id,
            name: record.name,
            price: record.price,
            stock_quantity: record.stock_quantity,
            kind,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub struct NewItem<'a> {
    pub dtype: ItemType,
    pub name: &'a str,
    pub price: i32,
    pub stock_quantity: i32,
    pub author: Option<&'a str>,
    pub isbn: Option<&'a str>,
    pub artist: Option<&'a str>,
    pub etc: Option<&'a str>,
}

impl<'a> NewItem<'a> {
    pub fn book(
        name: &'a str,
        price: i32,
        stock_quantity: i32,
        author: Option<&'a str>,
        isbn: Option<&'a str>,
    ) -> Self {
        Self {
            dtype: ItemType::Book,
            name,
            price,
            stock_quantity,
            author,
            isbn,
            artist: None,
            etc: None,
        }
    }

    pub fn movie(
        name: &'a str,
        price: i32,
        stock_quantity: i32,
        artist: Option<&'a str>,
        etc: Option<&'a str>,
    ) -> Self {
        Self {
            dtype: ItemType::Movie,
            name,
            price,
            stock_quantity,
            author: None,
            isbn: None,
            artist,
            etc,
        }
    }
}
