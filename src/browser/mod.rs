// Browser capability seam
//
// The rest of the crate only talks to this trait; the WebDriver adapter in
// `webdriver.rs` is the one real implementation. Tests inject fakes.
pub mod webdriver;

use crate::models::Cookie;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use webdriver::WebDriverBrowser;

/// Opaque reference to a located DOM element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHandle(pub String);

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("WebDriver request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebDriver protocol error ({error}): {message}")]
    Protocol { error: String, message: String },

    #[error("no element matched selector '{0}'")]
    NotFound(String),

    #[error("timed out after {timeout:?} waiting for selector '{selector}'")]
    WaitTimeout { selector: String, timeout: Duration },

    #[error("malformed WebDriver response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BrowserError {
    /// True when the error is the bounded-wait primitive giving up,
    /// as opposed to the driver or the site misbehaving.
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, BrowserError::WaitTimeout { .. })
    }
}

/// Everything the bot needs from a browser session
///
/// Selectors are CSS. One implementor drives a real chromedriver; the
/// integration tests script an in-memory fake against the same contract.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    async fn find(&self, selector: &str) -> Result<ElementHandle, BrowserError>;

    async fn find_all(&self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError>;

    /// Text of the first descendant of `parent` matching `selector`
    async fn child_text(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> Result<String, BrowserError>;

    /// Attribute of the first descendant of `parent` matching `selector`
    async fn child_attr(
        &self,
        parent: &ElementHandle,
        selector: &str,
        name: &str,
    ) -> Result<String, BrowserError>;

    async fn type_into(&self, selector: &str, text: &str) -> Result<(), BrowserError>;

    /// Click through JavaScript rather than a synthetic pointer event, so
    /// overlays and sticky banners on top of the target do not break it
    async fn click_js(&self, selector: &str) -> Result<(), BrowserError>;

    async fn add_cookie(&self, cookie: &Cookie) -> Result<(), BrowserError>;

    async fn cookies(&self) -> Result<Vec<Cookie>, BrowserError>;

    /// Poll for `selector` until it appears or `timeout` elapses.
    /// Failure is `BrowserError::WaitTimeout`, distinguishable from other errors.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError>;
}
