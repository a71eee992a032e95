use std::path::PathBuf;

use teloxide::{
    Bot,
    payloads::{SendMessageSetters, SendPhotoSetters},
    prelude::{Requester, ResponseResult},
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode},
    utils::html,
};

use crate::storage_traits::Product;

/// Callback-data identifiers for inline buttons. Routing in the callback
/// handler is first-match-wins on these prefixes.
pub const ADD_PREFIX: &str = "add_";
pub const BUY_PREFIX: &str = "buy_";
pub const CATEGORY_PREFIX: &str = "cat_";
pub const CONFIRM_CHECKOUT: &str = "confirm_checkout";

/// One-button keyboard attached to every product card
pub fn add_to_cart_keyboard(product_id: u64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🛒 Add to Cart",
        format!("{BUY_PREFIX}{product_id}"),
    )]])
}

/// One callback button per category, one per row
pub fn categories_menu(categories: &[String]) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = categories
        .iter()
        .map(|name| {
            vec![InlineKeyboardButton::callback(
                format!("📁 {name}"),
                format!("{CATEGORY_PREFIX}{name}"),
            )]
        })
        .collect();
    InlineKeyboardMarkup::new(buttons)
}

pub fn confirm_checkout_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "✅ Confirm",
        CONFIRM_CHECKOUT.to_string(),
    )]])
}

pub fn product_caption(product: &Product) -> String {
    format!(
        "<b>{}</b>\n<i>{}</i>\n\n💵 <b>${:.2}</b>",
        html::escape(&product.name),
        html::escape(&product.description),
        product.price
    )
}

/// Send one product as a photo card with an add-to-cart button. The image
/// field may hold a URL or a local path; with neither usable the card falls
/// back to plain text.
pub async fn send_product_card(bot: &Bot, chat_id: ChatId, product: &Product) -> ResponseResult<()> {
    let caption = product_caption(product);
    let keyboard = add_to_cart_keyboard(product.id);

    let photo = if let Ok(parsed) = url::Url::parse(&product.image) {
        Some(InputFile::url(parsed))
    } else if !product.image.is_empty() {
        Some(InputFile::file(PathBuf::from(&product.image)))
    } else {
        None
    };

    match photo {
        Some(photo) => {
            bot.send_photo(chat_id, photo)
                .caption(caption)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(chat_id, caption)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;

    use super::*;

    fn callback_data(markup: &InlineKeyboardMarkup, row: usize, col: usize) -> String {
        match &markup.inline_keyboard[row][col].kind {
            InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
            other => panic!("Expected callback button, got {:?}", other),
        }
    }

    #[test]
    fn test_add_to_cart_callback_data() {
        let markup = add_to_cart_keyboard(7);
        assert_eq!(callback_data(&markup, 0, 0), "buy_7");
    }

    #[test]
    fn test_categories_menu_one_button_per_row() {
        let markup = categories_menu(&["Fruit".to_string(), "Veg".to_string()]);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(callback_data(&markup, 0, 0), "cat_Fruit");
        assert_eq!(callback_data(&markup, 1, 0), "cat_Veg");
    }

    #[test]
    fn test_product_caption_escapes_html() {
        let product = Product {
            id: 1,
            name: "Mango <fresh>".to_string(),
            description: "a & b".to_string(),
            price: 5.0,
            image: String::new(),
            category: "Fruit".to_string(),
        };
        let caption = product_caption(&product);
        assert!(caption.contains("Mango &lt;fresh&gt;"));
        assert!(caption.contains("a &amp; b"));
        assert!(caption.contains("$5.00"));
    }
}
