mod backup;
mod commands;
mod config;
mod errors;
mod handlers;
pub mod menus;
mod purchase_log;
mod stats;
mod storage;
mod storage_traits;
mod webhook;

use std::sync::Arc;

use clap::Parser;
use commands::Command;
use config::{Args, BotConfig};
use handlers::{handle_callback_query, handle_command};
use storage::Storage;
use storage_traits::StorageTrait;
use teloxide::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    pretty_env_logger::init();
    log::info!("Starting storefront bot...");

    let token = args.get_token();
    let bot = Bot::new(token);

    let config = Arc::new(BotConfig::from_args(&args));
    log::info!(
        "Using data directory {:?}; {} admin(s) configured",
        config.data_dir,
        config.admins.len()
    );

    // One storage instance for the life of the process; every handler goes
    // through it, which is what keeps store mutations single-writer
    let storage = if args.ephemeral {
        log::info!("Using in-memory stores; state will not survive a restart");
        Storage::new()
    } else {
        Storage::open(&config.data_dir).await
    };
    let storage_trait: Arc<dyn StorageTrait> = Arc::new(storage);

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback_query));

    if let Some(public_url) = args.get_webhook_url() {
        webhook::run_webhook(bot, handler, storage_trait, config, &public_url, args.port).await;
    } else {
        log::info!("No webhook URL configured, running in long-polling mode");
        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![storage_trait, config])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}
