use std::sync::Arc;

use teloxide::{Bot, payloads::SendMessageSetters, prelude::*};

use crate::{
    menus::categories_menu,
    storage_traits::{CatalogStorageTrait, Product},
};

/// Distinct non-empty categories, sorted for a stable menu
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = products
        .iter()
        .filter(|p| !p.category.is_empty())
        .map(|p| p.category.clone())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

pub async fn categories_command(
    bot: Bot,
    msg: Message,
    catalog: Arc<dyn CatalogStorageTrait>,
) -> ResponseResult<()> {
    let categories = distinct_categories(&catalog.products().await);
    if categories.is_empty() {
        bot.send_message(msg.chat.id, "No categories available.")
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "Select a category:")
        .reply_markup(categories_menu(&categories))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_category(category: &str) -> Product {
        Product {
            id: 1,
            name: "Mango".to_string(),
            description: String::new(),
            price: 5.0,
            image: String::new(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_distinct_categories_sorted_and_deduped() {
        let products = vec![
            in_category("Veg"),
            in_category("Fruit"),
            in_category("Fruit"),
            in_category(""),
        ];
        assert_eq!(
            distinct_categories(&products),
            vec!["Fruit".to_string(), "Veg".to_string()]
        );
    }
}
