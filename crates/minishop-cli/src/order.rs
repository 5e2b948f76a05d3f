use minishop_core::{
    database::Database,
    orders::{self, OrderLineRequest},
    ShopResult,
};
use minishop_db::models::{
    order::Address,
    types::{DeliveryStatus, OrderStatus},
};
use nu_ansi_term::Color::{Blue, Cyan, Green, LightRed, Red, Yellow};
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tracing::info;

use crate::utils::{json_enabled, or_dash, print_json, Colored};

pub fn place_order(
    db: &Database,
    member_id: i32,
    lines: &[OrderLineRequest],
    address: Address,
) -> ShopResult<()> {
    let order_id = orders::place_order(db, member_id, lines, address)?;
    info!(
        order_id,
        "Placed order {} with {} line(s)",
        Colored(Green, order_id),
        lines.len()
    );
    Ok(())
}

fn status_label(status: OrderStatus) -> String {
    match status {
        OrderStatus::Ordered => Colored(Green, "ordered").to_string(),
        OrderStatus::Cancelled => Colored(Red, "cancelled").to_string(),
    }
}

fn delivery_label(status: DeliveryStatus) -> String {
    match status {
        DeliveryStatus::Ready => Colored(Yellow, "ready").to_string(),
        DeliveryStatus::Comp => Colored(Green, "delivered").to_string(),
    }
}

pub fn show_order(db: &Database, order_id: i32) -> ShopResult<()> {
    let detail = orders::order_detail(db, order_id)?;

    if json_enabled() {
        return print_json(&detail);
    }

    let mut builder = Builder::new();
    builder.push_record(["Order".to_string(), detail.order.id.to_string()]);
    builder.push_record([
        "Member".to_string(),
        format!(
            "{} ({})",
            Colored(Blue, or_dash(detail.member.username.as_deref())),
            detail.member.id
        ),
    ]);
    builder.push_record([
        "Date".to_string(),
        detail.order.order_date.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    builder.push_record(["Status".to_string(), status_label(detail.order.status)]);
    builder.push_record([
        "Delivery".to_string(),
        format!(
            "{} {}",
            delivery_label(detail.delivery.status),
            detail.delivery.address
        ),
    ]);
    for line in &detail.lines {
        builder.push_record([
            format!("#{}", line.order_item.item_id),
            format!(
                "{} x {} @ {} = {}",
                Colored(Cyan, &line.item.name),
                line.order_item.quantity,
                line.order_item.order_price,
                line.order_item.total_price()
            ),
        ]);
    }
    builder.push_record([
        "Total".to_string(),
        Colored(LightRed, detail.total_price()).to_string(),
    ]);

    let table = builder
        .build()
        .with(Panel::header(format!("Order {}", detail.order.id)))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();
    info!("\n{table}");

    Ok(())
}

pub fn list_orders(
    db: &Database,
    member_id: Option<i32>,
    status: Option<OrderStatus>,
) -> ShopResult<()> {
    let orders = orders::list_orders(db, member_id, status)?;

    if json_enabled() {
        return print_json(&orders);
    }

    if orders.is_empty() {
        info!("No orders found");
        return Ok(());
    }

    for order in &orders {
        info!(
            order_id = order.id,
            member_id = order.member_id,
            status = order.status.as_str(),
            "{} member {} | {} | {}",
            Colored(Yellow, format!("#{}", order.id)),
            Colored(Blue, order.member_id),
            order.order_date.format("%Y-%m-%d %H:%M"),
            status_label(order.status)
        );
    }

    Ok(())
}

pub fn cancel_order(db: &Database, order_id: i32) -> ShopResult<()> {
    orders::cancel_order(db, order_id)?;
    info!(order_id, "Cancelled order {}", Colored(Red, order_id));
    Ok(())
}

pub fn deliver_order(db: &Database, order_id: i32) -> ShopResult<()> {
    orders::complete_delivery(db, order_id)?;
    info!(order_id, "Delivered order {}", Colored(Green, order_id));
    Ok(())
}
