use crate::browser::Browser;
use crate::models::{AcceptOutcome, OrderRecord};
use std::time::Duration;

const SEL_ACCEPT_BTN: &str = ".col-xs-12.order-review .complete-order-btn-container button";
const SEL_CONFIRM_MODAL: &str = ".modal-content .complete-modal";
const SEL_CONFIRM_SUBMIT: &str = "#completeOrderSubmitBtn button[type='submit']";

/// How long the confirmation modal gets to render before the attempt is
/// abandoned for this cycle
const CONFIRM_TIMEOUT_SECS: u64 = 10;

/// Drives the two-step accept flow on an order's review page
///
/// Step one triggers the accept button, step two confirms in the modal.
/// A modal that never renders marks the attempt failed; the order is not
/// retried this cycle, but the next cycle re-discovers it if it is still
/// open.
pub struct OrderAcceptor<'a, B: Browser + ?Sized> {
    browser: &'a B,
}

impl<'a, B: Browser + ?Sized> OrderAcceptor<'a, B> {
    pub fn new(browser: &'a B) -> Self {
        Self { browser }
    }

    pub async fn accept(&self, order: &OrderRecord) -> anyhow::Result<AcceptOutcome> {
        self.browser.navigate(&order.link).await?;
        self.browser.click_js(SEL_ACCEPT_BTN).await?;

        let wait = self
            .browser
            .wait_for(SEL_CONFIRM_MODAL, Duration::from_secs(CONFIRM_TIMEOUT_SECS))
            .await;

        match wait {
            Ok(()) => {}
            Err(e) if e.is_wait_timeout() => return Ok(AcceptOutcome::Failed),
            Err(e) => return Err(e.into()),
        }

        self.browser.click_js(SEL_CONFIRM_SUBMIT).await?;
        Ok(AcceptOutcome::Accepted)
    }
}
