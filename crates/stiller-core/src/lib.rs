//! Core domain + application logic for the sticker stiller bot.
//!
//! This crate is intentionally framework-agnostic. The Telegram Bot API lives
//! behind the `PackPlatform` port (trait) implemented in the adapter crate.

pub mod config;
pub mod domain;
pub mod errors;
pub mod i18n;
pub mod links;
pub mod logging;
pub mod naming;
pub mod pipeline;
pub mod ports;
pub mod retry;
pub mod session;
pub mod storage;

pub use errors::{Error, ErrorCode, Result};
