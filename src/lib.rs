// src/lib.rs

//! ApaHukum: fatwa scraper and query bot library.

pub mod bot;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
