use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, UserId},
};

use crate::{
    commands::{Command, command_checkout::confirm_checkout, execute_command},
    config::BotConfig,
    menus::{ADD_PREFIX, BUY_PREFIX, CATEGORY_PREFIX, CONFIRM_CHECKOUT, send_product_card},
    storage_traits::StorageTrait,
};

/// Handle a parsed bot command from a text message
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    storage: Arc<dyn StorageTrait>,
    config: Arc<BotConfig>,
) -> ResponseResult<()> {
    log::info!("Executing {:?} in chat {}", cmd, msg.chat.id);
    execute_command(bot, msg, cmd, storage, config).await
}

/// Handle callback queries from inline keyboard buttons.
/// Routing is first-match-wins on the callback-data prefix.
pub async fn handle_callback_query(
    bot: Bot,
    q: CallbackQuery,
    storage: Arc<dyn StorageTrait>,
    config: Arc<BotConfig>,
) -> ResponseResult<()> {
    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id.clone()).await?;

    let user_id = q.from.id;

    // Get the message that contained the button
    let Some(message) = q.message else {
        return Ok(());
    };
    let Some(msg) = message.regular_message() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let Some(data) = &q.data else {
        return Ok(());
    };
    log::info!("Received callback data {} from user {}", data, user_id);

    if let Some(id_str) = data
        .strip_prefix(BUY_PREFIX)
        .or_else(|| data.strip_prefix(ADD_PREFIX))
    {
        add_to_cart(bot, chat_id, user_id, storage, id_str).await?;
    } else if let Some(category) = data.strip_prefix(CATEGORY_PREFIX) {
        show_category(bot, chat_id, storage, category).await?;
    } else if data == CONFIRM_CHECKOUT {
        confirm_checkout(bot, chat_id, user_id, storage, config).await?;
    } else {
        log::warn!("Unrecognized callback data: {}", data);
    }
    Ok(())
}

/// Snapshot the product into the user's cart. The copy is deliberate: a
/// later catalog edit must not change what is already in the cart.
async fn add_to_cart(
    bot: Bot,
    chat_id: ChatId,
    user_id: UserId,
    storage: Arc<dyn StorageTrait>,
    id_str: &str,
) -> ResponseResult<()> {
    let Ok(product_id) = id_str.parse::<u64>() else {
        log::warn!("Malformed add-to-cart payload: {}", id_str);
        return Ok(());
    };

    match storage.clone().as_catalog_storage().product(product_id).await {
        Some(product) => {
            let name = product.name.clone();
            storage.as_cart_storage().add_item(user_id, product).await;
            bot.send_message(chat_id, format!("✅ {name} added to your cart! 🛒"))
                .await?;
        }
        None => {
            bot.send_message(chat_id, "❌ This product is no longer available.")
                .await?;
        }
    }
    Ok(())
}

async fn show_category(
    bot: Bot,
    chat_id: ChatId,
    storage: Arc<dyn StorageTrait>,
    category: &str,
) -> ResponseResult<()> {
    let products = storage.as_catalog_storage().products().await;
    let filtered: Vec<_> = products.iter().filter(|p| p.category == category).collect();

    if filtered.is_empty() {
        bot.send_message(chat_id, format!("No products found in category: {category}"))
            .await?;
        return Ok(());
    }

    for product in filtered {
        send_product_card(&bot, chat_id, product).await?;
    }
    Ok(())
}
