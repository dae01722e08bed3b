//! Plain-text tables for the terminal.

use std::fmt::Write;

use rust_decimal::Decimal;

use feast::contract::model::{Dish, Language, Order, OrderStatus, User};
use feast::domain::cart::CartStore;
use feast::domain::catalog::Catalog;
use feast::domain::dashboard::Dashboard;
use feast::domain::panels::UserStats;

pub fn money(amount: Decimal) -> String {
    format!("{:.2} DA", amount)
}

pub fn menu(catalog: &Catalog, lang: Language) -> String {
    let mut out = String::new();
    for section in catalog.sections(lang) {
        let _ = writeln!(out, "== {} ==", section.title);
        for dish in section.dishes {
            let _ = write!(
                out,
                "  {:<16} {:<28} {:>12}",
                dish.id,
                dish.name.get(lang),
                money(dish.price)
            );
            if !dish.is_available {
                out.push_str("  (unavailable)");
            }
            out.push('\n');
            let description = dish.description.get(lang);
            if !description.trim().is_empty() {
                let _ = writeln!(out, "  {:<16} {description}", "");
            }
        }
    }
    if out.is_empty() {
        out.push_str("The menu is empty\n");
    }
    out
}

pub fn cart(cart: &CartStore) -> String {
    if cart.is_empty() {
        return "Your cart is empty\n".to_string();
    }
    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "  {:<16} {:<28} {:>3} × {:>12} = {:>12}",
            item.id,
            item.name,
            item.quantity,
            money(item.price),
            money(item.line_total())
        );
    }
    let _ = writeln!(
        out,
        "  {} item(s), total {}",
        cart.item_count(),
        money(cart.total())
    );
    out
}

pub fn dishes(dishes: &[&Dish], lang: Language) -> String {
    let mut out = format!(
        "  {:<38} {:<14} {:<24} {:>12}  {}\n",
        "ID", "CATEGORY", "NAME", "PRICE", "AVAILABLE"
    );
    for dish in dishes {
        let _ = writeln!(
            out,
            "  {:<38} {:<14} {:<24} {:>12}  {}",
            dish.id,
            dish.category_id.as_deref().unwrap_or("-"),
            dish.name.get(lang),
            money(dish.price),
            if dish.is_available { "yes" } else { "no" }
        );
    }
    let _ = writeln!(out, "  {} dish(es)", dishes.len());
    out
}

pub fn orders(orders: &[&Order]) -> String {
    let mut out = format!(
        "  {:<38} {:<17} {:<20} {:<16} {:>12}  {}\n",
        "ID", "PLACED", "CUSTOMER", "PHONE", "TOTAL", "STATUS"
    );
    for order in orders {
        let _ = writeln!(
            out,
            "  {:<38} {:<17} {:<20} {:<16} {:>12}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            order.customer_name,
            order.customer_phone,
            money(order.total_amount),
            order.status
        );
    }
    let _ = writeln!(out, "  {} order(s)", orders.len());
    out
}

pub fn status_counts(counts: &[(OrderStatus, usize)]) -> String {
    let parts: Vec<String> = counts
        .iter()
        .map(|(status, n)| format!("{status}: {n}"))
        .collect();
    format!("  {}\n", parts.join(" | "))
}

pub fn users(users: &[&User], stats: &UserStats) -> String {
    let mut out = format!(
        "  total {} | active {} | inactive {} | blocked {} | orders {} | spent {}\n",
        stats.total,
        stats.active,
        stats.inactive,
        stats.blocked,
        stats.total_orders,
        money(stats.total_spent)
    );
    let _ = writeln!(
        out,
        "  {:<38} {:<20} {:<28} {:<16} {:<10} {:>6} {:>12}  {}",
        "ID", "NAME", "EMAIL", "PHONE", "JOINED", "ORDERS", "SPENT", "STATUS"
    );
    for user in users {
        let _ = writeln!(
            out,
            "  {:<38} {:<20} {:<28} {:<16} {:<10} {:>6} {:>12}  {}",
            user.id,
            user.name,
            user.email,
            user.phone,
            user.join_date.to_string(),
            user.total_orders,
            money(user.total_spent),
            user.status
        );
    }
    out
}

pub fn dashboard(d: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Orders          {}", d.total_orders);
    let _ = writeln!(out, "Pending orders  {}", d.pending_orders);
    let _ = writeln!(out, "Dishes          {}", d.total_dishes);
    let _ = writeln!(out, "Revenue         {}", money(d.revenue));
    out.push_str("\nBy status\n");
    out.push_str(&status_counts(&d.by_status));
    if !d.daily.is_empty() {
        out.push_str("\nPer day\n");
        for point in &d.daily {
            let _ = writeln!(
                out,
                "  {}  {:>4} order(s)  {:>12}",
                point.day,
                point.orders,
                money(point.revenue)
            );
        }
    }
    if !d.dishes_per_category.is_empty() {
        out.push_str("\nDishes per category\n");
        for point in &d.dishes_per_category {
            let _ = writeln!(out, "  {:<24} {}", point.category, point.dishes);
        }
    }
    out
}
