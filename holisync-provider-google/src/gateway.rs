use google_calendar::Client;
use google_calendar::types::{OrderBy as GoogleOrderBy, SendUpdates};
use holisync_core::gateway::{ListQuery, RemoteCalendarGateway};
use holisync_core::{Event, HolisyncError, HolisyncResult, RemoteEvent};

use crate::config;
use crate::convert::{from_google_event, to_google_event};
use crate::session::Session;

/// `RemoteCalendarGateway` backed by the Google Calendar v3 API.
pub struct GoogleGateway {
    account: String,
    client: Client,
}

impl GoogleGateway {
    /// Authorize against Google with the stored tokens of `account` (or the
    /// only stored account). Fails before any calendar call is made.
    pub async fn connect(account: Option<&str>) -> HolisyncResult<Self> {
        let account = config::resolve_account(account).map_err(auth_error)?;
        let session = Session::load_valid(&account).await.map_err(auth_error)?;

        tracing::debug!(account = %session.account(), "connected to Google Calendar");

        Ok(GoogleGateway {
            client: session.client(),
            account,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

fn auth_error(e: anyhow::Error) -> HolisyncError {
    HolisyncError::Authentication(format!("{:#}", e))
}

impl RemoteCalendarGateway for GoogleGateway {
    // `list_all` follows page tokens to the end, so `max_results` has no
    // cap to enforce here.
    async fn list(&self, query: &ListQuery) -> HolisyncResult<Vec<RemoteEvent>> {
        let time_min = query.time_min.to_rfc3339();

        let response = self
            .client
            .events()
            .list_all(
                &query.calendar_id,
                "",
                0,
                GoogleOrderBy::StartTime,
                &[],
                "", // search query
                &[],
                false,
                false,
                query.single_events,
                "",
                &time_min,
                "",
                "",
            )
            .await
            .map_err(|e| HolisyncError::Remote(format!("Failed to fetch events: {}", e)))?;

        let mut events = Vec::new();

        for event in response.body {
            if event.status == "cancelled" {
                continue;
            }
            match from_google_event(event) {
                Ok(remote) => events.push(remote),
                Err(e) => tracing::warn!(error = %e, "skipping unreadable remote event"),
            }
        }

        tracing::debug!(calendar = %query.calendar_id, count = events.len(), "fetched all pages");
        Ok(events)
    }

    async fn insert(&self, calendar_id: &str, event: &Event) -> HolisyncResult<RemoteEvent> {
        let google_event = to_google_event(event);

        let response = self
            .client
            .events()
            .insert(calendar_id, 0, 0, false, SendUpdates::None, false, &google_event)
            .await
            .map_err(|e| HolisyncError::Remote(format!("Failed to create event {}: {}", event.summary(), e)))?;

        from_google_event(response.body).map_err(|e| HolisyncError::Remote(format!("{:#}", e)))
    }

    async fn delete(&self, calendar_id: &str, event_id: &str) -> HolisyncResult<()> {
        let result = self
            .client
            .events()
            .delete(calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                // Already gone counts as deleted
                if error_str.contains("410") || error_str.contains("Gone") {
                    Ok(())
                } else {
                    Err(HolisyncError::Remote(format!("Failed to delete event {}: {}", event_id, error_str)))
                }
            }
        }
    }
}
