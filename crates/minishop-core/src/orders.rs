//! Order placement and cancellation.
//!
//! An order, its delivery and its lines are saved together in one
//! transaction; any failing line rolls back the whole order including the
//! stock already taken for earlier lines.

use chrono::Local;
use minishop_db::{
    models::{
        order::{Address, NewOrderItem, Order, OrderDetail},
        types::{DeliveryStatus, OrderStatus},
    },
    repository::{ItemRepository, MemberRepository, OrderRepository},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{database::Database, error::ShopError, ShopResult};

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub item_id: i32,
    pub quantity: i32,
}

/// Places an order for `member_id` and returns the new order id.
///
/// Stock of every ordered item is decreased by the requested quantity and
/// each line records the item's current price.
pub fn place_order(
    db: &Database,
    member_id: i32,
    lines: &[OrderLineRequest],
    address: Address,
) -> ShopResult<i32> {
    if lines.is_empty() {
        return Err(ShopError::EmptyOrder);
    }
    if let Some(line) = lines.iter().find(|l| l.quantity <= 0) {
        return Err(ShopError::InvalidQuantity {
            item_id: line.item_id,
            quantity: line.quantity,
        });
    }

    db.transaction(|conn| {
        MemberRepository::find_by_id(conn, member_id)?
            .ok_or(ShopError::MemberNotFound(member_id))?;

        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let item = ItemRepository::find_by_id(conn, line.item_id)?
                .ok_or(ShopError::ItemNotFound(line.item_id))?;

            if !ItemRepository::decrease_stock(conn, item.id, line.quantity)? {
                return Err(ShopError::InsufficientStock {
                    name: item.name,
                    requested: line.quantity,
                    available: item.stock_quantity,
                });
            }
            debug!(item_id = item.id, quantity = line.quantity, "stock reserved");
            priced.push((item.id, item.price, line.quantity));
        }

        let delivery_id = OrderRepository::insert_delivery(conn, &address)?;
        let order_id =
            OrderRepository::insert_order(conn, member_id, delivery_id, Local::now().naive_local())?;

        let order_items: Vec<NewOrderItem> = priced
            .into_iter()
            .map(|(item_id, order_price, quantity)| NewOrderItem {
                order_id,
                item_id,
                order_price,
                quantity,
            })
            .collect();
        OrderRepository::insert_order_items(conn, &order_items)?;

        debug!(order_id, member_id, lines = order_items.len(), "order placed");
        Ok(order_id)
    })
}

/// Cancels an order and puts its items back in stock.
pub fn cancel_order(db: &Database, order_id: i32) -> ShopResult<()> {
    db.transaction(|conn| {
        let order = OrderRepository::find_by_id(conn, order_id)?
            .ok_or(ShopError::OrderNotFound(order_id))?;

        if order.status == OrderStatus::Cancelled {
            return Err(ShopError::AlreadyCancelled(order_id));
        }

        let delivery = OrderRepository::find_delivery(conn, order.delivery_id)?
            .ok_or(ShopError::OrderNotFound(order_id))?;
        if delivery.status == DeliveryStatus::Comp {
            return Err(ShopError::AlreadyDelivered(order_id));
        }

        for line in OrderRepository::find_lines(conn, &order)? {
            ItemRepository::increase_stock(
                conn,
                line.order_item.item_id,
                line.order_item.quantity,
            )?;
        }
        OrderRepository::update_status(conn, order_id, OrderStatus::Cancelled)?;

        debug!(order_id, "order cancelled");
        Ok(())
    })
}

/// Marks the delivery of an order as completed.
pub fn complete_delivery(db: &Database, order_id: i32) -> ShopResult<()> {
    db.transaction(|conn| {
        let order = OrderRepository::find_by_id(conn, order_id)?
            .ok_or(ShopError::OrderNotFound(order_id))?;

        if order.status == OrderStatus::Cancelled {
            return Err(ShopError::AlreadyCancelled(order_id));
        }

        OrderRepository::update_delivery_status(conn, order.delivery_id, DeliveryStatus::Comp)?;
        debug!(order_id, delivery_id = order.delivery_id, "delivery completed");
        Ok(())
    })
}

pub fn order_detail(db: &Database, order_id: i32) -> ShopResult<OrderDetail> {
    db.with_conn(|conn| OrderRepository::find_detail(conn, order_id))?
        .ok_or(ShopError::OrderNotFound(order_id))
}

pub fn list_orders(
    db: &Database,
    member_id: Option<i32>,
    status: Option<OrderStatus>,
) -> ShopResult<Vec<Order>> {
    db.with_conn(|conn| OrderRepository::list(conn, member_id, status))
}
