//! Orders with their deliveries and lines.
//!
//! Saving an order is an explicit sequence: [`OrderRepository::insert_delivery`],
//! [`OrderRepository::insert_order`], then [`OrderRepository::insert_order_items`].
//! Callers run the sequence inside one transaction. Nothing cascades on delete.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::{
    models::{
        item::{Item, ItemRecord},
        member::Member,
        order::{
            Address, Delivery, NewDelivery, NewOrder, NewOrderItem, Order, OrderDetail, OrderItem,
            OrderLine,
        },
        types::{DeliveryStatus, OrderStatus},
    },
    schema::{deliveries, items, members, order_items, orders},
};

/// Repository for orders, deliveries and order items.
pub struct OrderRepository;

impl OrderRepository {
    /// Inserts a delivery in the `READY` state and returns its id.
    pub fn insert_delivery(conn: &mut SqliteConnection, address: &Address) -> QueryResult<i32> {
        diesel::insert_into(deliveries::table)
            .values(NewDelivery {
                address: address.clone(),
                status: DeliveryStatus::Ready,
            })
            .returning(deliveries::id)
            .get_result(conn)
    }

    /// Inserts an order in the `ORDER` state and returns its id.
    pub fn insert_order(
        conn: &mut SqliteConnection,
        member_id: i32,
        delivery_id: i32,
        order_date: NaiveDateTime,
    ) -> QueryResult<i32> {
        diesel::insert_into(orders::table)
            .values(NewOrder {
                member_id,
                delivery_id,
                order_date,
                status: OrderStatus::Ordered,
            })
            .returning(orders::id)
            .get_result(conn)
    }

    pub fn insert_order_items(
        conn: &mut SqliteConnection,
        lines: &[NewOrderItem],
    ) -> QueryResult<usize> {
        diesel::insert_into(order_items::table)
            .values(lines)
            .execute(conn)
    }

    pub fn find_by_id(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Order>> {
        orders::table
            .filter(orders::id.eq(id))
            .select(Order::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_delivery(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Delivery>> {
        deliveries::table
            .filter(deliveries::id.eq(id))
            .select(Delivery::as_select())
            .first(conn)
            .optional()
    }

    /// Lines of `order` joined with their items, ordered by line id.
    pub fn find_lines(conn: &mut SqliteConnection, order: &Order) -> QueryResult<Vec<OrderLine>> {
        let rows: Vec<(OrderItem, ItemRecord)> = OrderItem::belonging_to(order)
            .inner_join(items::table)
            .order(order_items::id.asc())
            .select((OrderItem::as_select(), ItemRecord::as_select()))
            .load(conn)?;

        Ok(rows
            .into_iter()
            .map(|(order_item, record)| OrderLine {
                order_item,
                item: Item::from(record),
            })
            .collect())
    }

    /// Loads an order with its member and delivery in one joined query, then
    /// its lines.
    pub fn find_detail(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<OrderDetail>> {
        let row: Option<(Order, Member, Delivery)> = orders::table
            .inner_join(members::table)
            .inner_join(deliveries::table)
            .filter(orders::id.eq(id))
            .select((
                Order::as_select(),
                Member::as_select(),
                Delivery::as_select(),
            ))
            .first(conn)
            .optional()?;

        let Some((order, member, delivery)) = row else {
            return Ok(None);
        };

        let lines = Self::find_lines(conn, &order)?;

        Ok(Some(OrderDetail {
            order,
            member,
            delivery,
            lines,
        }))
    }

    /// Lists orders newest first, optionally filtered by member and status.
    pub fn list(
        conn: &mut SqliteConnection,
        member_id: Option<i32>,
        status: Option<OrderStatus>,
    ) -> QueryResult<Vec<Order>> {
        let mut query = orders::table.into_boxed();

        if let Some(member_id) = member_id {
            query = query.filter(orders::member_id.eq(member_id));
        }
        if let Some(status) = status {
            query = query.filter(orders::status.eq(status));
        }

        query
            .order(orders::id.desc())
            .select(Order::as_select())
            .load(conn)
    }

    pub fn update_status(
        conn: &mut SqliteConnection,
        id: i32,
        status: OrderStatus,
    ) -> QueryResult<usize> {
        diesel::update(orders::table.filter(orders::id.eq(id)))
            .set(orders::status.eq(status))
            .execute(conn)
    }

    pub fn update_delivery_status(
        conn: &mut SqliteConnection,
        delivery_id: i32,
        status: DeliveryStatus,
    ) -> QueryResult<usize> {
        diesel::update(deliveries::table.filter(deliveries::id.eq(delivery_id)))
            .set(deliveries::status.eq(status))
            .execute(conn)
    }
}
