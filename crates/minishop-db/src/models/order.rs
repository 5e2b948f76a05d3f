use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::{
    models::{
        item::Item,
        member::Member,
        types::{DeliveryStatus, OrderStatus},
    },
    schema::{deliveries, order_items, orders},
};

/// Shipping address embedded in a delivery row.
#[derive(Debug, Clone, Default, PartialEq, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Address {
    pub city: Option<String>,
    pub street: Option<String>,
    pub zipcode: Option<String>,
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = [&self.city, &self.street, &self.zipcode]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = deliveries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Delivery {
    pub id: i32,
    #[diesel(embed)]
    pub address: Address,
    pub status: DeliveryStatus,
}

#[derive(Insertable)]
#[diesel(table_name = deliveries)]
pub struct NewDelivery {
    #[diesel(embed)]
    pub address: Address,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(Member))]
#[diesel(belongs_to(Delivery))]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Order {
    pub id: i32,
    pub member_id: i32,
    pub delivery_id: i32,
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
}

#[derive(Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub member_id: i32,
    pub delivery_id: i32,
    pub order_date: NaiveDateTime,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(Order))]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub order_price: i32,
    pub quantity: i32,
}

impl OrderItem {
    pub fn total_price(&self) -> i64 {
        i64::from(self.order_price) * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub item_id: i32,
    pub order_price: i32,
    pub quantity: i32,
}

/// One order line together with the catalog item it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    #[serde(flatten)]
    pub order_item: OrderItem,
    pub item: Item,
}

/// An order with everything it owns or references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub member: Member,
    pub delivery: Delivery,
    pub lines: Vec<OrderLine>,
}

impl OrderDetail {
    pub fn total_price(&self) -> i64 {
        self.lines.iter().map(|l| l.order_item.total_price()).sum()
    }
}
