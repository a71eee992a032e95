use std::sync::Arc;

use teloxide::{Bot, prelude::*, types::UserId};

use crate::{
    config::BotConfig,
    errors::{Result, StoreError},
    storage_traits::{CatalogStorageTrait, NewProduct},
};

const USAGE: &str = "Usage:\n/addproduct <name>; <price>; <description>; <image_url>; <category>";

/// Parse the semicolon-separated field list of `/addproduct`. Semicolons
/// keep names and descriptions free to contain spaces.
pub fn parse_product_fields(line: &str) -> Result<NewProduct> {
    let fields: Vec<&str> = line.split(';').map(str::trim).collect();
    let [name, price, description, image, category] = fields.as_slice() else {
        return Err(StoreError::Validation(format!(
            "expected 5 fields, got {}",
            fields.len()
        )));
    };
    if name.is_empty() || category.is_empty() {
        return Err(StoreError::Validation(
            "name and category must not be empty".to_string(),
        ));
    }
    let price: f64 = price
        .parse()
        .map_err(|_| StoreError::Validation(format!("invalid price: {price}")))?;

    Ok(NewProduct {
        name: name.to_string(),
        price,
        description: description.to_string(),
        image: image.to_string(),
        category: category.to_string(),
    })
}

pub async fn add_product_command(
    bot: Bot,
    msg: Message,
    user_id: UserId,
    config: Arc<BotConfig>,
    catalog: Arc<dyn CatalogStorageTrait>,
    fields: Option<String>,
) -> ResponseResult<()> {
    if config.require_admin(user_id).is_err() {
        bot.send_message(msg.chat.id, "❌ You are not authorized to add products.")
            .await?;
        return Ok(());
    }

    let Some(fields) = fields else {
        bot.send_message(msg.chat.id, USAGE).await?;
        return Ok(());
    };

    let new = match parse_product_fields(&fields) {
        Ok(new) => new,
        Err(StoreError::Validation(reason)) => {
            bot.send_message(msg.chat.id, format!("❌ {reason}\n\n{USAGE}"))
                .await?;
            return Ok(());
        }
        Err(e) => {
            log::error!("Unexpected error parsing a product field list: {}", e);
            bot.send_message(msg.chat.id, USAGE).await?;
            return Ok(());
        }
    };

    // The store re-validates the price (non-negative, finite) before assigning an id
    match catalog.add_product(new).await {
        Ok(product) => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "✅ Product '{}' added successfully (id {}).",
                    product.name, product.id
                ),
            )
            .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, format!("❌ {e}")).await?;
        }
    }
    Ok(())
}
