pub mod cleanup;
pub mod generate;
pub mod holidays;
pub mod import;

use anyhow::Result;
use holisync_core::config::HolisyncConfig;
use holisync_core::sync::SyncEngine;
use holisync_provider_google::GoogleGateway;

/// Authorize before anything touches the calendar.
async fn connect(config: &HolisyncConfig) -> Result<GoogleGateway> {
    let gateway = GoogleGateway::connect(config.google_account.as_deref()).await?;
    tracing::debug!(account = %gateway.account(), calendar = %config.calendar_id, "using calendar");
    Ok(gateway)
}

fn engine<'a>(gateway: &'a GoogleGateway, config: &HolisyncConfig) -> SyncEngine<'a, GoogleGateway> {
    SyncEngine::new(gateway)
        .with_calendar(&config.calendar_id)
        .with_max_results(config.max_results)
}
