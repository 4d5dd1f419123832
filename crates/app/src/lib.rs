//! `stockroom-app`
//!
//! **Responsibility:** Headless presentation layer over the inventory store.
//!
//! This crate provides:
//! - Configuration from the environment
//! - The `App` facade that UI callbacks call into (every command returns a `Notice`)
//! - Theme preference persistence
//!
//! Rendering is left to whatever shell embeds it.

pub mod commands;
pub mod config;
pub mod notice;
pub mod preferences;

pub use commands::{App, AppError, ProductForm, bootstrap};
pub use config::AppConfig;
pub use notice::{Notice, NoticeLevel};
pub use preferences::Theme;
