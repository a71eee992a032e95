use std::collections::HashMap;

use teloxide::types::UserId;

use crate::storage_traits::Product;

/// Aggregate figures over the full order history. Read-only; derived on
/// demand for the admin `/stats` report.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesStats {
    /// Users with at least one recorded order
    pub total_users: usize,
    /// Completed checkouts across all users
    pub total_orders: usize,
    /// Sum of every purchased line item's snapshot price
    pub total_revenue: f64,
    /// Product names ranked by purchase frequency, most popular first
    pub top_products: Vec<(String, usize)>,
}

/// Scan the order map and derive user, order, revenue and popularity totals.
/// Ranking is by item-name frequency; ties break alphabetically so the
/// report is stable between runs.
pub fn aggregate(orders: &HashMap<UserId, Vec<Vec<Product>>>) -> SalesStats {
    let mut total_orders = 0;
    let mut total_revenue = 0.0;
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for user_orders in orders.values() {
        total_orders += user_orders.len();
        for order in user_orders {
            for item in order {
                total_revenue += item.price;
                *counts.entry(item.name.as_str()).or_default() += 1;
            }
        }
    }

    let mut top_products: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    top_products.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    SalesStats {
        total_users: orders.len(),
        total_orders,
        total_revenue,
        top_products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64) -> Product {
        Product {
            id: 0,
            name: name.to_string(),
            description: String::new(),
            price,
            image: String::new(),
            category: String::new(),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let stats = aggregate(&HashMap::new());
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, 0.0);
        assert!(stats.top_products.is_empty());
    }

    #[test]
    fn test_aggregate_counts_orders_revenue_and_ranking() {
        let mut orders = HashMap::new();
        orders.insert(
            UserId(1),
            vec![
                vec![item("Mango", 5.0), item("Kiwi", 2.0)],
                vec![item("Mango", 5.0)],
            ],
        );
        orders.insert(UserId(2), vec![vec![item("Mango", 5.0)]]);

        let stats = aggregate(&orders);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_orders, 3);
        assert!((stats.total_revenue - 17.0).abs() < f64::EPSILON);
        assert_eq!(
            stats.top_products,
            vec![("Mango".to_string(), 3), ("Kiwi".to_string(), 1)]
        );
    }

    #[test]
    fn test_aggregate_ties_break_alphabetically() {
        let mut orders = HashMap::new();
        orders.insert(
            UserId(1),
            vec![vec![item("Mango", 5.0), item("Kiwi", 2.0)]],
        );

        let stats = aggregate(&orders);
        assert_eq!(
            stats.top_products,
            vec![("Kiwi".to_string(), 1), ("Mango".to_string(), 1)]
        );
    }
}
