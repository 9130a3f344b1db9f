use crate::browser::{Browser, BrowserError};
use crate::events::{BotEvent, EventSink};
use crate::models::Credentials;
use crate::persistence::SessionStore;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

const LOGIN_URL: &str = "https://www.boostingfactory.com/login";
const PROFILE_URL: &str = "https://www.boostingfactory.com/profile";

const SEL_USERNAME: &str = "input#uName";
const SEL_PASSWORD: &str = "input[type='password'][name='uPassword']";
const SEL_SUBMIT: &str = "button[type='submit']";

/// Settle time after navigation; the portal renders client-side
const PAGE_SETTLE_MS: u64 = 3000;

/// One resume attempt plus one credential attempt.
///
/// Caps the stale-session fallback so a site that redirects everything to
/// the login page (outage, layout change) cannot loop the bot forever.
const MAX_LOGIN_ATTEMPTS: u32 = 2;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Fresh credential login still landed on the login page. Unrecoverable
    /// without operator action, so the process should halt.
    #[error("portal rejected the login credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// Establishes a logged-in session, preferring stored cookies over the
/// credential form
///
/// Stale cookies are recoverable (discard and fall back to credentials,
/// once); rejected credentials are fatal. That asymmetry is the whole
/// error-handling story of this module.
pub struct Authenticator<'a, B: Browser + ?Sized, S: SessionStore + ?Sized> {
    browser: &'a B,
    store: &'a S,
    credentials: &'a Credentials,
}

impl<'a, B: Browser + ?Sized, S: SessionStore + ?Sized> Authenticator<'a, B, S> {
    pub fn new(browser: &'a B, store: &'a S, credentials: &'a Credentials) -> Self {
        Self {
            browser,
            store,
            credentials,
        }
    }

    pub async fn login(&self, sink: &dyn EventSink) -> Result<(), AuthError> {
        for _attempt in 1..=MAX_LOGIN_ATTEMPTS {
            if let Some(cookies) = self.store.load() {
                if self.resume_session(&cookies).await? {
                    sink.emit(&BotEvent::LoginSucceeded { resumed: true });
                    return Ok(());
                }

                // Stale session: discard wholesale and fall back to credentials
                tracing::info!("Stored session rejected by the portal, discarding it");
                self.store.clear();
                continue;
            }

            return self.credential_login(sink).await;
        }

        // Cookie resume was retried up to the cap without ever reaching the
        // credential path; treat it like a credential failure.
        Err(AuthError::InvalidCredentials)
    }

    /// Inject stored cookies into a fresh context and probe an
    /// authenticated-only page. True when the portal kept us logged in.
    async fn resume_session(
        &self,
        cookies: &[crate::models::Cookie],
    ) -> Result<bool, AuthError> {
        // Must be on the portal's domain before cookies can be attached
        self.browser.navigate(LOGIN_URL).await?;

        for cookie in cookies {
            self.browser.add_cookie(cookie).await?;
        }

        self.browser.navigate(PROFILE_URL).await?;
        sleep(Duration::from_millis(PAGE_SETTLE_MS)).await;

        self.is_logged_in().await
    }

    async fn credential_login(&self, sink: &dyn EventSink) -> Result<(), AuthError> {
        self.browser.navigate(LOGIN_URL).await?;
        sleep(Duration::from_millis(PAGE_SETTLE_MS)).await;

        self.browser
            .type_into(SEL_USERNAME, &self.credentials.username)
            .await?;
        self.browser
            .type_into(SEL_PASSWORD, &self.credentials.password)
            .await?;
        self.browser.click_js(SEL_SUBMIT).await?;
        sleep(Duration::from_millis(PAGE_SETTLE_MS)).await;

        if !self.is_logged_in().await? {
            return Err(AuthError::InvalidCredentials);
        }

        // Persist the new session wholesale; failure to persist only costs
        // a re-login next run, so it must not fail the bot
        match self.browser.cookies().await {
            Ok(cookies) => {
                if let Err(e) = self.store.save(&cookies) {
                    tracing::warn!("Could not persist session cookies: {}", e);
                }
            }
            Err(e) => tracing::warn!("Could not read session cookies: {}", e),
        }

        sink.emit(&BotEvent::LoginSucceeded { resumed: false });
        Ok(())
    }

    /// Still resolving to the login surface means not authenticated
    async fn is_logged_in(&self) -> Result<bool, AuthError> {
        let url = self.browser.current_url().await?;
        Ok(!url.starts_with(LOGIN_URL))
    }
}
