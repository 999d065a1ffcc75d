use crate::booking::{Conversation, ShopClock};
use crate::communication::SessionStore;
use crate::database::{BookingStore, DatabaseService, MemoryStore};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File read error")]
    FileError,

    #[error("Deserialization error:{0}")]
    DeserializationError(String),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Store error:{0}")]
    StoreError(String),
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Supabase,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub store: StoreKind,
    pub shop: ShopConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShopConfig {
    pub name: String,
    pub timezone: String,
    pub currency_symbol: String,
    /// Phone recorded for customers of channels that don't provide one.
    pub default_phone: String,
    pub address: String,
    pub maps_url: String,
    pub whatsapp: String,
    pub instagram: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: "KendyBlack".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            currency_symbol: "R$".to_string(),
            default_phone: "5563999999999".to_string(),
            address: String::new(),
            maps_url: String::new(),
            whatsapp: String::new(),
            instagram: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub typing_delay_ms: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            typing_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionsConfig {
    pub idle_minutes: u64,
    pub max_sessions: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_minutes: 30,
            max_sessions: 10_000,
        }
    }
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl ShopConfig {
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }
}

#[derive(Clone)]
pub struct Context {
    pub config: Config,
    pub conversation: Arc<Conversation>,
    pub sessions: SessionStore,
}

impl Context {
    pub fn new(config_file: &str) -> Result<Self, ConfigError> {
        let config = Config::new(config_file)?;
        let store: Arc<dyn BookingStore> = match config.store {
            StoreKind::Supabase => Arc::new(
                DatabaseService::new().map_err(|e| ConfigError::StoreError(e.to_string()))?,
            ),
            StoreKind::Memory => Arc::new(MemoryStore::demo()),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn BookingStore>) -> Result<Self, ConfigError> {
        let clock = Arc::new(ShopClock::new(config.shop.tz()?));
        let conversation = Arc::new(Conversation::new(
            store,
            clock,
            config.shop.clone(),
        ));
        let sessions = SessionStore::new(
            Duration::from_secs(config.sessions.idle_minutes * 60),
            config.sessions.max_sessions,
        );
        Ok(Self {
            config,
            conversation,
            sessions,
        })
    }
}

impl Config {
    pub fn new(config_file: &str) -> Result<Self, ConfigError> {
        let config_str = fs::read_to_string(config_file).map_err(|_| ConfigError::FileError)?;
        Self::from_json(&config_str)
    }

    pub fn from_json(config_str: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(config_str)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        config.shop.tz()?;
        Ok(config)
    }
}
