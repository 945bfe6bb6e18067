//! Telegram bot.
//!
//! The bot is a thin command router: it parses inbound commands, identifies
//! the caller and forwards validated operations to the ledger engine. Updates
//! arrive over an HTTP webhook when a public URL is configured, and over long
//! polling otherwise.

use std::sync::Arc;

use teloxide::{prelude::*, update_listeners::webhooks};
use url::Url;

use engine::Engine;

mod commands;
mod handlers;
mod parsing;

/// Context handed to every command handler through the dispatcher, instead
/// of module-level singletons.
#[derive(Clone)]
pub struct ConfigParameters {
    engine: Arc<Engine>,
}

/// Public endpoint Telegram delivers updates to.
#[derive(Clone, Debug)]
struct Webhook {
    url: Url,
    port: u16,
}

pub struct Bot {
    token: String,
    engine: Arc<Engine>,
    webhook: Option<Webhook>,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);
        let parameters = ConfigParameters {
            engine: self.engine.clone(),
        };

        let mut dispatcher = Dispatcher::builder(bot.clone(), handlers::schema())
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build();

        match &self.webhook {
            Some(webhook) => {
                let addr = ([0, 0, 0, 0], webhook.port).into();
                let options = webhooks::Options::new(addr, webhook.url.clone());
                let listener = match webhooks::axum(bot, options).await {
                    Ok(listener) => listener,
                    Err(err) => {
                        tracing::error!("failed to register the telegram webhook: {err}");
                        return;
                    }
                };

                dispatcher
                    .dispatch_with_listener(
                        listener,
                        LoggingErrorHandler::with_custom_text(
                            "An error from the update listener",
                        ),
                    )
                    .await;
            }
            None => dispatcher.dispatch().await,
        }
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    engine: Option<Arc<Engine>>,
    webhook: Option<(String, u16)>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn engine(mut self, engine: Arc<Engine>) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    pub fn webhook(mut self, url: &str, port: u16) -> BotBuilder {
        self.webhook = Some((url.to_string(), port));
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");

        if self.token.is_empty() {
            return Err("missing telegram token".to_string());
        }
        let engine = self
            .engine
            .ok_or_else(|| "missing ledger engine".to_string())?;

        let webhook = match self.webhook {
            Some((url, port)) => {
                let url = url
                    .parse::<Url>()
                    .map_err(|err| format!("invalid webhook url: {err}"))?;
                Some(Webhook { url, port })
            }
            None => None,
        };

        Ok(Bot {
            token: self.token,
            engine,
            webhook,
        })
    }
}
