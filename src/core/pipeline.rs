//! The list → select → resolve → deliver pipeline.

use tracing::info;

use crate::core::config::Config;
use crate::core::delivery::{self, Context, DeliveryReport};
use crate::core::process::Runner;
use crate::core::{catalog, entry, menu};
use crate::error::Result;

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The user backed out of the menu. Nothing was decrypted.
    Cancelled,
    /// An entry was decrypted and every delivery step attempted.
    Delivered { id: String, report: DeliveryReport },
}

/// Run the whole pipeline once.
///
/// # Errors
///
/// Listing, menu start-up and decryption failures abort the run. Delivery
/// failures do not; they are recorded in the returned report.
pub fn run(config: &Config, runner: &dyn Runner) -> Result<Outcome> {
    let candidates = catalog::list(&config.store, config.filter.as_ref())?;

    let args = menu::menu_args(config.delivery.mode(), &config.menu_args);
    let Some(id) = menu::select(runner, &config.tools.dmenu, &args, &candidates)? else {
        return Ok(Outcome::Cancelled);
    };

    let (resolved, content) = entry::resolve(
        runner,
        &config.tools.pass,
        &config.store,
        &id,
        config.username.as_ref(),
    )?;

    let ctx = Context {
        id: &id,
        store: &config.store,
        filter: config.filter.as_ref().map(|f| f.source.as_str()),
    };
    let report = delivery::dispatch(runner, config, &resolved, &content, ctx);
    let failed = report.failures().count();
    if failed == 0 {
        info!(id = %id, "delivered");
    } else {
        info!(id = %id, failed, "delivery incomplete");
    }

    Ok(Outcome::Delivered { id, report })
}
