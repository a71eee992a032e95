use std::sync::Arc;

use teloxide::{Bot, prelude::*};

use crate::{
    menus::send_product_card,
    storage_traits::{CatalogStorageTrait, Product},
};

/// Case-insensitive substring match against product name and description
pub fn search_products<'a>(products: &'a [Product], keyword: &str) -> Vec<&'a Product> {
    let keyword = keyword.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&keyword)
                || p.description.to_lowercase().contains(&keyword)
        })
        .collect()
}

pub async fn search_command(
    bot: Bot,
    msg: Message,
    catalog: Arc<dyn CatalogStorageTrait>,
    keyword: Option<String>,
) -> ResponseResult<()> {
    let Some(keyword) = keyword else {
        bot.send_message(msg.chat.id, "Usage: /search <keyword>")
            .await?;
        return Ok(());
    };

    let products = catalog.products().await;
    let matches = search_products(&products, &keyword);
    if matches.is_empty() {
        bot.send_message(msg.chat.id, "No matching products found.")
            .await?;
        return Ok(());
    }

    for product in matches {
        send_product_card(&bot, msg.chat.id, product).await?;
    }
    Ok(())
}
