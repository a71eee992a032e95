use std::sync::Arc;

use teloxide::{
    Bot,
    payloads::SendMessageSetters,
    prelude::*,
    types::{ParseMode, UserId},
    utils::html,
};

use crate::storage_traits::{CartStorageTrait, Product, total_price};

/// Itemised cart listing with the derived total
pub fn format_cart(items: &[Product]) -> String {
    let mut message = String::from("🛒 <b>Your Cart:</b>\n\n");
    for item in items {
        message.push_str(&format!(
            "• {} - ${:.2}\n",
            html::escape(&item.name),
            item.price
        ));
    }
    message.push_str(&format!("\n<b>Total:</b> ${:.2}", total_price(items)));
    message
}

pub async fn cart_command(
    bot: Bot,
    msg: Message,
    user_id: UserId,
    carts: Arc<dyn CartStorageTrait>,
) -> ResponseResult<()> {
    let cart = carts.cart(user_id).await;
    if cart.is_empty() {
        bot.send_message(msg.chat.id, "Your cart is empty.").await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, format_cart(&cart))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64) -> Product {
        Product {
            id: 1,
            name: name.to_string(),
            description: String::new(),
            price,
            image: String::new(),
            category: String::new(),
        }
    }

    #[test]
    fn test_format_cart_sums_snapshot_prices() {
        let text = format_cart(&[item("Mango", 5.0), item("Kiwi", 2.5)]);
        assert!(text.contains("• Mango - $5.00"));
        assert!(text.contains("• Kiwi - $2.50"));
        assert!(text.contains("<b>Total:</b> $7.50"));
    }
}
