use std::path::PathBuf;

use clap::Parser;
use teloxide::types::UserId;

pub const PREDEFINED_BOT_TOKEN_RELEASE: Option<&str> = option_env!("PREDEFINED_BOT_TOKEN_RELEASE");
pub const PREDEFINED_BOT_TOKEN_DEBUG: Option<&str> = option_env!("PREDEFINED_BOT_TOKEN_DEBUG");
pub const PREDEFINED_BOT_TOKEN: Option<&str> = if cfg!(debug_assertions) {
    PREDEFINED_BOT_TOKEN_DEBUG
} else {
    PREDEFINED_BOT_TOKEN_RELEASE
};
pub const BOT_TOKEN_HELP: &str = if PREDEFINED_BOT_TOKEN_RELEASE.is_some() {
    "Environment variable name containing the bot token. If not set, uses precompiled token"
} else {
    "Environment variable name containing the bot token (required)"
};

/// A Telegram storefront bot: catalog browsing, carts, checkout, order history
#[derive(Parser, Debug)]
#[command(name = "storebot")]
#[command(about = "A Telegram storefront bot", long_about = None)]
pub struct Args {
    #[arg(long, help = BOT_TOKEN_HELP)]
    pub bot_token_env: Option<String>,

    /// Directory holding the catalog, cart, order and log files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Keep all stores in memory and skip the JSON files (state is lost on
    /// restart; purchase log and backups are still written)
    #[arg(long)]
    pub ephemeral: bool,

    /// Telegram user id allowed to manage the catalog and view stats (repeatable)
    #[arg(long = "admin", value_name = "USER_ID")]
    pub admins: Vec<u64>,

    /// PayPal.me account name used to build payment links.
    /// Falls back to the PAYPAL_USERNAME environment variable.
    #[arg(long)]
    pub paypal_username: Option<String>,

    /// Public base URL to register as the Telegram webhook.
    /// When absent the bot runs in long-polling mode.
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Port the webhook server listens on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

impl Args {
    /// Get the bot token from CLI args or predefined token
    pub fn get_token(&self) -> String {
        if let Some(env_name) = &self.bot_token_env {
            std::env::var(env_name)
                .unwrap_or_else(|_| panic!("Environment variable {} not found", env_name))
        } else if let Some(predefined) = PREDEFINED_BOT_TOKEN {
            predefined.to_string()
        } else {
            panic!("No bot token provided and no precompiled token available. Use --bot-token-env")
        }
    }

    /// Public webhook base URL from the CLI or the PUBLIC_URL environment
    /// variable. `None` selects long-polling mode.
    pub fn get_webhook_url(&self) -> Option<String> {
        self.webhook_url
            .clone()
            .or_else(|| std::env::var("PUBLIC_URL").ok())
    }

    /// Resolve the PayPal merchant name; missing configuration is fatal at
    /// startup, never mid-checkout.
    pub fn get_paypal_username(&self) -> String {
        self.paypal_username
            .clone()
            .or_else(|| std::env::var("PAYPAL_USERNAME").ok())
            .unwrap_or_else(|| {
                panic!("No PayPal account configured. Use --paypal-username or PAYPAL_USERNAME")
            })
    }
}

/// Runtime configuration shared with every handler through dptree
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub admins: Vec<UserId>,
    pub paypal_username: String,
    pub data_dir: PathBuf,
}

impl BotConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            admins: args.admins.iter().map(|id| UserId(*id)).collect(),
            paypal_username: args.get_paypal_username(),
            data_dir: args.data_dir.clone(),
        }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admins.contains(&user_id)
    }

    /// Static allow-list gate for catalog mutation and stats
    pub fn require_admin(&self, user_id: UserId) -> crate::errors::Result<()> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(crate::errors::StoreError::Authorization)
        }
    }

    /// Payment redirect of the form `<provider-base>/<merchant>/<amount>`
    pub fn payment_link(&self, amount: f64) -> String {
        format!("https://paypal.me/{}/{:.2}", self.paypal_username, amount)
    }
}
