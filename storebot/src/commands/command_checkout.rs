use std::{path::Path, sync::Arc};

use teloxide::{
    Bot,
    payloads::SendMessageSetters,
    prelude::*,
    types::{ChatId, ParseMode, UserId},
    utils::html,
};

use crate::{
    backup::backup_files,
    config::BotConfig,
    menus::confirm_checkout_keyboard,
    purchase_log::log_purchase,
    storage_traits::{CartStorageTrait, Product, StorageTrait, total_price},
};

/// Pre-confirmation summary: items, total, confirmation question
pub fn format_checkout_summary(items: &[Product]) -> String {
    let mut message = String::from("🧾 <b>Checkout Summary:</b>\n\n");
    for item in items {
        message.push_str(&format!(
            "• {} - ${:.2}\n",
            html::escape(&item.name),
            item.price
        ));
    }
    message.push_str(&format!("\n<b>Total:</b> ${:.2}\n\n", total_price(items)));
    message.push_str("Do you want to confirm your purchase?");
    message
}

/// Show the cart total with a confirm button; nothing is mutated here
pub async fn checkout_command(
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

    bot.send_message(msg.chat.id, format_checkout_summary(&cart))
        .parse_mode(ParseMode::Html)
        .reply_markup(confirm_checkout_keyboard())
        .await?;
    Ok(())
}

/// Commit the cart as one order group: append to the order history, clear
/// the cart, append to the purchase log, mirror the store files into a
/// fresh backup directory.
///
/// The cart is re-read here: it may have emptied between review and confirm
/// (a second confirm press lands on this path too), in which case nothing
/// is mutated, no backup is made and `None` is returned. Log and backup
/// failures do not roll the purchase back; they are only logged.
pub async fn commit_purchase(
    user_id: UserId,
    storage: Arc<dyn StorageTrait>,
    data_dir: &Path,
) -> Option<Vec<Product>> {
    let carts = storage.clone().as_cart_storage();
    let cart = carts.cart(user_id).await;
    if cart.is_empty() {
        return None;
    }

    storage
        .as_order_storage()
        .append_order(user_id, cart.clone())
        .await;
    carts.clear_cart(user_id).await;

    if let Err(e) = log_purchase(data_dir, user_id, &cart).await {
        log::error!("Failed to append to the purchase log: {}", e);
    }
    match backup_files(data_dir).await {
        Ok(dir) => log::info!("Backed up store files to {}", dir.display()),
        Err(e) => log::error!("Backup after purchase failed: {}", e),
    }

    Some(cart)
}

/// Finalise a purchase after the confirm button press. The order is
/// recorded optimistically, before the payment link is even sent; payment
/// arrives out of band and is verified manually.
pub async fn confirm_checkout(
    bot: Bot,
    chat_id: ChatId,
    user_id: UserId,
    storage: Arc<dyn StorageTrait>,
    config: Arc<BotConfig>,
) -> ResponseResult<()> {
    let Some(items) = commit_purchase(user_id, storage, &config.data_dir).await else {
        bot.send_message(chat_id, "Your cart is empty.").await?;
        return Ok(());
    };

    let total = total_price(&items);
    let link = config.payment_link(total);
    bot.send_message(
        chat_id,
        format!(
            "💳 Please pay <b>${:.2}</b> using the link below:\n{}\n\n\
             📸 After payment, please send a screenshot or your PayPal email \
             for manual verification.\n\n\
             ✅ Thank you for your purchase!",
            total, link
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    Ok(())
}
