use std::sync::Arc;

use teloxide::{Bot, prelude::*};

use crate::{menus::send_product_card, storage_traits::CatalogStorageTrait};

/// Emit one card per catalog product, each with its own add-to-cart button
pub async fn list_command(
    bot: Bot,
    msg: Message,
    catalog: Arc<dyn CatalogStorageTrait>,
) -> ResponseResult<()> {
    let products = catalog.products().await;
    if products.is_empty() {
        bot.send_message(msg.chat.id, "No products available yet.")
            .await?;
        return Ok(());
    }

    for product in &products {
        send_product_card(&bot, msg.chat.id, product).await?;
    }
    Ok(())
}
