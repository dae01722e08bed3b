use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::contract::model::{Category, Dish, Language, Order, OrderStatus};
use crate::domain::panels::orders::status_counts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPoint {
    pub day: NaiveDate,
    pub orders: usize,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPoint {
    pub category: String,
    pub dishes: usize,
}

/// Figures for the admin overview, computed from the fetched collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub total_dishes: usize,
    pub revenue: Decimal,
    pub by_status: Vec<(OrderStatus, usize)>,
    /// One point per calendar day (UTC) that has orders, oldest first.
    pub daily: Vec<DailyPoint>,
    /// Categories in display order, then dishes without a known category.
    pub dishes_per_category: Vec<CategoryPoint>,
}

impl Dashboard {
    pub fn compute(orders: &[Order], dishes: &[Dish], categories: &[Category], lang: Language) -> Self {
        let mut daily: BTreeMap<NaiveDate, DailyPoint> = BTreeMap::new();
        for order in orders {
            let day = order.created_at.date_naive();
            let point = daily.entry(day).or_insert(DailyPoint {
                day,
                orders: 0,
                revenue: Decimal::ZERO,
            });
            point.orders += 1;
            point.revenue += order.total_amount;
        }

        let mut sorted: Vec<&Category> = categories.iter().collect();
        sorted.sort_by_key(|c| c.display_order);
        let mut dishes_per_category: Vec<CategoryPoint> = sorted
            .iter()
            .map(|c| CategoryPoint {
                category: c.name.get(lang).to_string(),
                dishes: dishes
                    .iter()
                    .filter(|d| d.category_id.as_deref() == Some(c.id.as_str()))
                    .count(),
            })
            .collect();
        let uncategorized = dishes
            .iter()
            .filter(|d| {
                d.category_id
                    .as_deref()
                    .map_or(true, |id| !categories.iter().any(|c| c.id == id))
            })
            .count();
        if uncategorized > 0 {
            dishes_per_category.push(CategoryPoint {
                category: "Uncategorized".to_string(),
                dishes: uncategorized,
            });
        }

        Self {
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            total_dishes: dishes.len(),
            revenue: orders.iter().map(|o| o.total_amount).sum(),
            by_status: status_counts(orders),
            daily: daily.into_values().collect(),
            dishes_per_category,
        }
    }
}
