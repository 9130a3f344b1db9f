// Core modules
pub mod auth;
pub mod bot;
pub mod browser;
pub mod config;
pub mod discovery;
pub mod events;
pub mod execution;
pub mod filter;
pub mod models;
pub mod persistence;

// Re-export commonly used types
pub use auth::{AuthError, Authenticator};
pub use bot::OrderBot;
pub use browser::{Browser, BrowserError, ElementHandle, WebDriverBrowser};
pub use events::{BotEvent, EventSink, LogSink};
pub use filter::KeywordFilter;
pub use models::*;
pub use persistence::{FileSessionStore, SessionStore};

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
