// src/models/mod.rs

//! Domain models for the scraper and the bot.

mod config;
mod document;
mod selectors;

// Re-export all public types
pub use config::{
    BotConfig, Config, CrawlerConfig, ENV_BOT_TOKEN, ENV_SOURCE_URL, ScheduleConfig, SourceConfig,
    StoreConfig,
};
pub use document::{Document, SENTINEL_CONTENT};
pub use selectors::SelectorChains;
