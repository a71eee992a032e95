use std::{net::SocketAddr, sync::Arc};

use axum::{Json, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};
use teloxide::{
    Bot,
    dispatching::UpdateHandler,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    update_listeners::webhooks,
};
use url::Url;

use crate::{config::BotConfig, storage_traits::StorageTrait};

/// Claimed payment notification posted by the payment provider. The payload
/// is unauthenticated and unverified; it is logged for manual
/// reconciliation and nothing else. Orders were already committed at
/// confirm time.
#[derive(Debug, Deserialize)]
struct PaymentNotification {
    payer_email: Option<String>,
    #[serde(default)]
    amount: f64,
    /// Telegram user id passed through the payment flow
    custom: Option<String>,
}

async fn paypal_webhook(Json(notification): Json<PaymentNotification>) -> Json<Value> {
    log::info!(
        "PayPal payment from {} for ${:.2} (user {})",
        notification.payer_email.as_deref().unwrap_or("<unknown>"),
        notification.amount,
        notification.custom.as_deref().unwrap_or("<unknown>"),
    );
    Json(json!({"status": "received"}))
}

/// Run the dispatcher behind a registered Telegram webhook instead of long
/// polling. The PayPal notification route is served from the same listener.
pub async fn run_webhook(
    bot: Bot,
    handler: UpdateHandler<teloxide::RequestError>,
    storage: Arc<dyn StorageTrait>,
    config: Arc<BotConfig>,
    public_url: &str,
    port: u16,
) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let url = Url::parse(&format!("{}/webhook", public_url.trim_end_matches('/')))
        .unwrap_or_else(|e| panic!("Malformed webhook URL {public_url}: {e}"));

    let (listener, stop_flag, router) =
        webhooks::axum_to_router(bot.clone(), webhooks::Options::new(addr, url.clone()))
            .await
            .expect("Failed to register the Telegram webhook");
    log::info!("🚀 Webhook set to {}", url);

    let router = router.route("/paypal/webhook", post(paypal_webhook));
    let tcp = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(tcp, router)
            .with_graceful_shutdown(stop_flag)
            .await
        {
            log::error!("Webhook server terminated: {}", e);
        }
    });

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![storage, config])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_notification_deserializes_sparse_payloads() {
        let full: PaymentNotification = serde_json::from_str(
            r#"{"payer_email": "a@b.c", "amount": 5.0, "custom": "42"}"#,
        )
        .unwrap();
        assert_eq!(full.payer_email.as_deref(), Some("a@b.c"));
        assert_eq!(full.amount, 5.0);
        assert_eq!(full.custom.as_deref(), Some("42"));

        // Fields the provider omits default instead of rejecting the payload
        let sparse: PaymentNotification = serde_json::from_str("{}").unwrap();
        assert!(sparse.payer_email.is_none());
        assert_eq!(sparse.amount, 0.0);
    }
}
