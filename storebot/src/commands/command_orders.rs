use std::sync::Arc;

use teloxide::{
    Bot,
    payloads::SendMessageSetters,
    prelude::*,
    types::{ParseMode, UserId},
    utils::html,
};

use crate::storage_traits::{OrderStorageTrait, Product, total_price};

/// One line per completed order: its items and the snapshot total
pub fn format_orders(orders: &[Vec<Product>]) -> String {
    let mut message = String::from("📦 <b>Your Orders:</b>\n");
    for (i, order) in orders.iter().enumerate() {
        let items = order
            .iter()
            .map(|p| html::escape(&p.name))
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!(
            "\nOrder {}: {} | Total: ${:.2}",
            i + 1,
            items,
            total_price(order)
        ));
    }
    message
}

pub async fn orders_command(
    bot: Bot,
    msg: Message,
    user_id: UserId,
    orders: Arc<dyn OrderStorageTrait>,
) -> ResponseResult<()> {
    let history = orders.orders(user_id).await;
    if history.is_empty() {
        bot.send_message(msg.chat.id, "You have no completed purchases.")
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, format_orders(&history))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
