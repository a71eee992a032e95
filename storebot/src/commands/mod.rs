pub mod command_add_product;
pub mod command_cart;
pub mod command_categories;
pub mod command_checkout;
pub mod command_help;
pub mod command_list;
pub mod command_orders;
pub mod command_remove_product;
pub mod command_search;
pub mod command_start;
pub mod command_stats;

use std::sync::Arc;

use teloxide::{
    Bot,
    prelude::*,
    utils::command::{BotCommands, ParseError},
};

use crate::{config::BotConfig, storage_traits::StorageTrait};

/// Custom parser keeping the rest of the command line as one optional
/// argument. Missing arguments become `None`; the handler answers with a
/// usage message instead of the dispatcher rejecting the command.
fn parse_rest_of_line(s: String) -> Result<(Option<String>,), ParseError> {
    // Take only the first line to prevent multi-line capture
    let first_line = s.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        Ok((None,))
    } else {
        Ok((Some(first_line.to_string()),))
    }
}

/// Bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "welcome message")]
    Start,
    #[command(description = "display this help")]
    Help,
    #[command(description = "browse all products")]
    List,
    #[command(description = "view your cart")]
    Cart,
    #[command(description = "review your cart and confirm your purchase")]
    Checkout,
    #[command(description = "view your past orders")]
    Orders,
    #[command(description = "browse products by category")]
    Categories,
    #[command(
        description = "search products by keyword",
        parse_with = parse_rest_of_line
    )]
    Search { keyword: Option<String> },
    #[command(
        description = "add a product: name; price; description; image; category (admin only)",
        rename = "addproduct",
        parse_with = parse_rest_of_line
    )]
    AddProduct { fields: Option<String> },
    #[command(
        description = "remove a product by id (admin only)",
        rename = "removeproduct",
        parse_with = parse_rest_of_line
    )]
    RemoveProduct { id: Option<String> },
    #[command(description = "show sales stats (admin only)")]
    Stats,
}

/// Execute a single parsed command. Every store error is converted into a
/// reply inside the per-command handlers; only transport errors propagate.
pub async fn execute_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    storage: Arc<dyn StorageTrait>,
    config: Arc<BotConfig>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.clone() else {
        // Channel posts and other senderless updates have no cart to act on
        log::warn!("Ignoring command without a sender in chat {}", msg.chat.id);
        return Ok(());
    };
    let user_id = user.id;

    match cmd {
        Command::Start => {
            command_start::start_command(bot, msg).await?;
        }
        Command::Help => {
            command_help::help_command(bot, msg).await?;
        }
        Command::List => {
            command_list::list_command(bot, msg, storage.as_catalog_storage()).await?;
        }
        Command::Cart => {
            command_cart::cart_command(bot, msg, user_id, storage.as_cart_storage()).await?;
        }
        Command::Checkout => {
            command_checkout::checkout_command(bot, msg, user_id, storage.as_cart_storage())
                .await?;
        }
        Command::Orders => {
            command_orders::orders_command(bot, msg, user_id, storage.as_order_storage()).await?;
        }
        Command::Categories => {
            command_categories::categories_command(bot, msg, storage.as_catalog_storage()).await?;
        }
        Command::Search { keyword } => {
            command_search::search_command(bot, msg, storage.as_catalog_storage(), keyword)
                .await?;
        }
        Command::AddProduct { fields } => {
            command_add_product::add_product_command(
                bot,
                msg,
                user_id,
                config,
                storage.as_catalog_storage(),
                fields,
            )
            .await?;
        }
        Command::RemoveProduct { id } => {
            command_remove_product::remove_product_command(
                bot,
                msg,
                user_id,
                config,
                storage.as_catalog_storage(),
                id,
            )
            .await?;
        }
        Command::Stats => {
            command_stats::stats_command(bot, msg, user_id, config, storage.as_order_storage())
                .await?;
        }
    }
    Ok(())
}
