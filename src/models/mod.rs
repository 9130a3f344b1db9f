use serde::{Deserialize, Serialize};

/// Portal login credentials, loaded from the environment at startup
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// One browser cookie
///
/// Field names follow the WebDriver wire format so the same struct is used
/// for the driver endpoints and the on-disk session snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(rename = "httpOnly", default)]
    pub http_only: bool,
    /// Unix timestamp; session cookies have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            expiry: None,
        }
    }
}

/// An order currently visible on the dashboard
///
/// Discovered fresh every cycle and dropped afterwards - the portal stops
/// listing an order once it has been claimed, so no history is kept here.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub title: String,
    /// Link to the order's review page
    pub link: String,
}

/// What happened to a single order within one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptOutcome {
    /// Accept flow completed through the confirmation modal
    Accepted,
    /// Title did not match any keyword
    Skipped,
    /// Confirmation modal never rendered within the wait budget
    Failed,
}

/// Per-cycle counters, reported through `BotEvent::CycleComplete`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleStats {
    pub found: usize,
    pub matched: usize,
    pub accepted: usize,
    pub failed: usize,
}
