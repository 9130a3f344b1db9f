use crate::browser::Browser;
use crate::models::OrderRecord;
use crate::Result;
use std::time::Duration;
use tokio::time::sleep;

const DASHBOARD_URL: &str = "https://www.boostingfactory.com/profile";

const SEL_ORDERS_TAB: &str = "a[href='#ongoingOrders']";
const SEL_ORDER_CARDS: &str = "div#ongoingOrders div.single-order";
const SEL_ORDER_TITLE: &str = "h3";
const SEL_ORDER_LINK: &str = "a";

/// The orders tab renders client-side; re-open it a few times with short
/// waits instead of trusting the first query
const RENDER_ATTEMPTS: u32 = 3;
const RENDER_WAIT_MS: u64 = 2000;

/// Reads the currently visible open orders off the dashboard
///
/// The dashboard is the source of truth: nothing is cached across cycles,
/// and an order that disappeared simply is not returned again.
pub struct OrderLister<'a, B: Browser + ?Sized> {
    browser: &'a B,
}

impl<'a, B: Browser + ?Sized> OrderLister<'a, B> {
    pub fn new(browser: &'a B) -> Self {
        Self { browser }
    }

    /// One cycle's snapshot of open orders (title + review-page link)
    pub async fn list(&self) -> Result<Vec<OrderRecord>> {
        let cards = self.rendered_cards().await?;

        let mut orders = Vec::with_capacity(cards.len());
        for card in &cards {
            let title = match self.browser.child_text(card, SEL_ORDER_TITLE).await {
                Ok(title) => title,
                Err(e) => {
                    tracing::warn!("Skipping order card without a title: {}", e);
                    continue;
                }
            };

            let link = match self.browser.child_attr(card, SEL_ORDER_LINK, "href").await {
                Ok(link) => link,
                Err(e) => {
                    tracing::warn!("Skipping order '{}' without a link: {}", title.trim(), e);
                    continue;
                }
            };

            orders.push(OrderRecord { title, link });
        }

        Ok(orders)
    }

    /// Navigate to the orders tab and poll until cards render or the
    /// attempt budget runs out. An empty dashboard also ends up here; an
    /// empty cycle is normal, so this never raises.
    async fn rendered_cards(&self) -> Result<Vec<crate::browser::ElementHandle>> {
        let mut cards = Vec::new();

        for attempt in 1..=RENDER_ATTEMPTS {
            self.browser.navigate(DASHBOARD_URL).await?;
            self.browser.click_js(SEL_ORDERS_TAB).await?;
            sleep(Duration::from_millis(RENDER_WAIT_MS)).await;

            cards = self.browser.find_all(SEL_ORDER_CARDS).await?;
            if !cards.is_empty() {
                break;
            }

            if attempt < RENDER_ATTEMPTS {
                tracing::debug!(
                    "No order cards rendered yet (attempt {}/{})",
                    attempt,
                    RENDER_ATTEMPTS
                );
            }
        }

        Ok(cards)
    }
}
