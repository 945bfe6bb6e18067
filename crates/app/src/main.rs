use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "skarbnyk={level},telegram_bot={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = match parse_database(&settings.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let engine = engine::Engine::builder().database(db).build();

    let mut builder = telegram_bot::Bot::builder()
        .token(&settings.telegram.token)
        .engine(Arc::new(engine));
    if let Some(url) = &settings.telegram.webhook_url {
        builder = builder.webhook(url, settings.telegram.webhook_port.unwrap_or(8443));
    }

    match builder.build() {
        Ok(bot) => bot.run().await,
        Err(err) => tracing::error!("failed to initialize telegram bot: {err}"),
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
        Database::Url(url) => url.clone(),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
