use barber_assistant::communication::http::ChatApiService;
use barber_assistant::communication::telegram::TelegramService;
use barber_assistant::configuration::Context;
use barber_assistant::core::ServiceManager;
use barber_assistant::AppError;
use dotenvy::dotenv;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok();
    let context =
        Context::new("config.json").map_err(|e| AppError::ConfigError(e.to_string()))?;

    let log_level = Level::from_str(&context.config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(log_level.to_string()))
        .init();
    tracing::info!(shop = %context.config.shop.name, "Starting Barber Assistant");

    let telegram_enabled = context.config.telegram.enabled;
    let mut service_manager = ServiceManager::new(context);
    service_manager.spawn::<ChatApiService>();
    if telegram_enabled {
        service_manager.spawn::<TelegramService>();
    }

    service_manager
        .wait()
        .await
        .map_err(|_| AppError::ServiceError)
}
