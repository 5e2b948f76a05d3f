use minishop_core::{catalog, database::Database, ShopResult};
use minishop_db::models::{item::ItemKind, types::ItemType};
use nu_ansi_term::Color::{Blue, Cyan, Green, Magenta};
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tracing::info;

use crate::utils::{json_enabled, or_dash, print_json, Colored};

pub fn add_book(
    db: &Database,
    name: &str,
    price: i32,
    stock: i32,
    author: Option<&str>,
    isbn: Option<&str>,
) -> ShopResult<()> {
    let id = catalog::add_book(db, name, price, stock, author, isbn)?;
    info!(item_id = id, "Added book {} ({})", Colored(Blue, name), id);
    Ok(())
}

pub fn add_movie(
    db: &Database,
    name: &str,
    price: i32,
    stock: i32,
    artist: Option<&str>,
    etc: Option<&str>,
) -> ShopResult<()> {
    let id = catalog::add_movie(db, name, price, stock, artist, etc)?;
    info!(item_id = id, "Added movie {} ({})", Colored(Blue, name), id);
    Ok(())
}

pub fn list_items(db: &Database, item_type: Option<ItemType>) -> ShopResult<()> {
    let items = catalog::list_items(db, item_type)?;

    if json_enabled() {
        return print_json(&items);
    }

    if items.is_empty() {
        info!("No items found");
        return Ok(());
    }

    let mut builder = Builder::new();
    builder.push_record(["ID", "Type", "Name", "Price", "Stock", "Details"]);
    for item in &items {
        let details = match &item.kind {
            ItemKind::Book { author, isbn } => format!(
                "author: {}, isbn: {}",
                or_dash(author.as_deref()),
                or_dash(isbn.as_deref())
            ),
            ItemKind::Movie { artist, etc } => format!(
                "artist: {}, etc: {}",
                or_dash(artist.as_deref()),
                or_dash(etc.as_deref())
            ),
        };
        let kind = match item.kind.item_type() {
            ItemType::Book => "book",
            ItemType::Movie => "movie",
        };

        builder.push_record([
            item.id.to_string(),
            Colored(Magenta, kind).to_string(),
            Colored(Blue, &item.name).to_string(),
            Colored(Green, item.price).to_string(),
            Colored(Cyan, item.stock_quantity).to_string(),
            details,
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Catalog"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();
    info!("\n{table}");

    Ok(())
}
