use std::sync::Arc;

use teloxide::{Bot, prelude::*, types::UserId};

use crate::{config::BotConfig, errors::StoreError, storage_traits::CatalogStorageTrait};

pub async fn remove_product_command(
    bot: Bot,
    msg: Message,
    user_id: UserId,
    config: Arc<BotConfig>,
    catalog: Arc<dyn CatalogStorageTrait>,
    id: Option<String>,
) -> ResponseResult<()> {
    if config.require_admin(user_id).is_err() {
        bot.send_message(msg.chat.id, "❌ You are not authorized to remove products.")
            .await?;
        return Ok(());
    }

    let Some(id) = id else {
        bot.send_message(msg.chat.id, "Usage:\n/removeproduct <product_id>")
            .await?;
        return Ok(());
    };
    let Ok(product_id) = id.parse::<u64>() else {
        bot.send_message(msg.chat.id, "❌ Invalid product ID.").await?;
        return Ok(());
    };

    if catalog.remove_product(product_id).await {
        bot.send_message(msg.chat.id, format!("✅ Product ID {product_id} removed."))
            .await?;
    } else {
        bot.send_message(msg.chat.id, format!("❌ {}", StoreError::NotFound(product_id)))
            .await?;
    }
    Ok(())
}
