use crate::browser::{Browser, BrowserError, ElementHandle};
use crate::models::Cookie;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// W3C element identifier key used in WebDriver element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Poll tick for the bounded-wait primitive
const WAIT_POLL_MS: u64 = 250;

/// Browser implementation speaking the W3C WebDriver REST protocol
///
/// Talks to a locally running chromedriver (default port 9515). The protocol
/// is plain JSON over HTTP: every response wraps its payload in a `value`
/// field, and errors carry `error` + `message` strings inside that field.
pub struct WebDriverBrowser {
    http: Client,
    base_url: String,
    session_id: String,
}

// ============== Response Types ==============

#[derive(Debug, Deserialize)]
struct SessionData {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    message: String,
}

impl WebDriverBrowser {
    /// Create a fresh browser session against a running WebDriver server
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, BrowserError> {
        let http = Client::new();

        let mut args = vec!["--window-size=1920,1080".to_string()];
        if headless {
            args.push("--headless=new".to_string());
        }

        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let url = format!("{}/session", webdriver_url.trim_end_matches('/'));
        let raw = http.post(&url).json(&body).send().await?.json().await?;
        let value = unwrap_value(raw)?;
        let session: SessionData = serde_json::from_value(value)?;

        tracing::info!("WebDriver session {} started", session.session_id);

        Ok(Self {
            http,
            base_url: webdriver_url.trim_end_matches('/').to_string(),
            session_id: session.session_id,
        })
    }

    /// End the session and close the browser window
    pub async fn close(self) -> Result<(), BrowserError> {
        let url = format!("{}/session/{}", self.base_url, self.session_id);
        self.http.delete(&url).send().await?;
        Ok(())
    }

    fn session_url(&self, path: &str) -> String {
        format!("{}/session/{}/{}", self.base_url, self.session_id, path)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, BrowserError> {
        let raw = self
            .http
            .post(self.session_url(path))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        unwrap_value(raw)
    }

    async fn get(&self, path: &str) -> Result<Value, BrowserError> {
        let raw = self
            .http
            .get(self.session_url(path))
            .send()
            .await?
            .json()
            .await?;
        unwrap_value(raw)
    }

    /// Element lookup shared by top-level and descendant finds
    async fn find_in(&self, path: &str, selector: &str) -> Result<ElementHandle, BrowserError> {
        let body = json!({ "using": "css selector", "value": selector });
        match self.post(path, body).await {
            Ok(value) => element_from_value(&value, selector),
            Err(BrowserError::Protocol { error, .. }) if error == "no such element" => {
                Err(BrowserError::NotFound(selector.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.post("url", json!({ "url": url })).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let value = self.get("url").await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn find(&self, selector: &str) -> Result<ElementHandle, BrowserError> {
        self.find_in("element", selector).await
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError> {
        let body = json!({ "using": "css selector", "value": selector });
        let value = self.post("elements", body).await?;

        let refs: Vec<Value> = serde_json::from_value(value)?;
        refs.iter()
            .map(|v| element_from_value(v, selector))
            .collect()
    }

    async fn child_text(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> Result<String, BrowserError> {
        let child = self
            .find_in(&format!("element/{}/element", parent.0), selector)
            .await?;
        let value = self.get(&format!("element/{}/text", child.0)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn child_attr(
        &self,
        parent: &ElementHandle,
        selector: &str,
        name: &str,
    ) -> Result<String, BrowserError> {
        let child = self
            .find_in(&format!("element/{}/element", parent.0), selector)
            .await?;
        let value = self
            .get(&format!("element/{}/attribute/{}", child.0, name))
            .await?;

        // Absent attributes come back as null
        match value {
            Value::Null => Err(BrowserError::NotFound(format!("{}@{}", selector, name))),
            v => Ok(serde_json::from_value(v)?),
        }
    }

    async fn type_into(&self, selector: &str, text: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        self.post(
            &format!("element/{}/value", element.0),
            json!({ "text": text }),
        )
        .await?;
        Ok(())
    }

    async fn click_js(&self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        self.post(
            "execute/sync",
            json!({
                "script": "arguments[0].click();",
                "args": [{ ELEMENT_KEY: element.0 }]
            }),
        )
        .await?;
        Ok(())
    }

    async fn add_cookie(&self, cookie: &Cookie) -> Result<(), BrowserError> {
        self.post("cookie", json!({ "cookie": cookie })).await?;
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<Cookie>, BrowserError> {
        let value = self.get("cookie").await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.find(selector).await {
                Ok(_) => return Ok(()),
                Err(BrowserError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout,
                });
            }

            sleep(Duration::from_millis(WAIT_POLL_MS)).await;
        }
    }
}

/// Unwrap the `{"value": ...}` envelope, surfacing wire-level errors
fn unwrap_value(raw: Value) -> Result<Value, BrowserError> {
    let value = raw
        .get("value")
        .cloned()
        .unwrap_or(Value::Null);

    if let Ok(err) = serde_json::from_value::<WireError>(value.clone()) {
        return Err(BrowserError::Protocol {
            error: err.error,
            message: err.message,
        });
    }

    Ok(value)
}

fn element_from_value(value: &Value, selector: &str) -> Result<ElementHandle, BrowserError> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementHandle(id.to_string()))
        .ok_or_else(|| BrowserError::NotFound(selector.to_string()))
}
