use std::sync::Arc;

use teloxide::{
    Bot,
    payloads::SendMessageSetters,
    prelude::*,
    types::{ParseMode, UserId},
    utils::html,
};

use crate::{
    config::BotConfig,
    stats::{SalesStats, aggregate},
    storage_traits::OrderStorageTrait,
};

pub fn format_stats(stats: &SalesStats) -> String {
    let top = match stats.top_products.first() {
        Some((name, count)) => format!("{} ({} sold)", html::escape(name), count),
        None => "None".to_string(),
    };
    format!(
        "📊 <b>Usage Stats:</b>\n\
         👥 Users: <b>{}</b>\n\
         🛒 Orders: <b>{}</b>\n\
         💰 Revenue: <b>${:.2}</b>\n\
         🔥 Top Product: <b>{}</b>",
        stats.total_users, stats.total_orders, stats.total_revenue, top
    )
}

pub async fn stats_command(
    bot: Bot,
    msg: Message,
    user_id: UserId,
    config: Arc<BotConfig>,
    orders: Arc<dyn OrderStorageTrait>,
) -> ResponseResult<()> {
    if config.require_admin(user_id).is_err() {
        bot.send_message(msg.chat.id, "❌ You are not authorized to view stats.")
            .await?;
        return Ok(());
    }

    let stats = aggregate(&orders.all_orders().await);
    bot.send_message(msg.chat.id, format_stats(&stats))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stats_with_and_without_sales() {
        let empty = SalesStats {
            total_users: 0,
            total_orders: 0,
            total_revenue: 0.0,
            top_products: Vec::new(),
        };
        assert!(format_stats(&empty).contains("Top Product: <b>None</b>"));

        let stats = SalesStats {
            total_users: 2,
            total_orders: 3,
            total_revenue: 17.0,
            top_products: vec![("Mango".to_string(), 3)],
        };
        let text = format_stats(&stats);
        assert!(text.contains("Users: <b>2</b>"));
        assert!(text.contains("Orders: <b>3</b>"));
        assert!(text.contains("Revenue: <b>$17.00</b>"));
        assert!(text.contains("Mango (3 sold)"));
    }
}
