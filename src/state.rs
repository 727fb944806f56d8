use std::sync::Arc;

use rollbook_calendar::{Clock, FixedClock, SystemClock, TermCalendar};
use rollbook_config::{ServerConfig, UpstreamConfig, WizardConfig};
use tracing::{info, warn};

use crate::modules::upstream::{RosterSource, SubmissionAdapter, UpstreamClient};
use crate::modules::wizard::WizardRegistry;

#[derive(Clone)]
pub struct AppState {
    pub wizards: Arc<WizardRegistry>,
    pub calendar: Arc<TermCalendar>,
    pub clock: Arc<dyn Clock>,
    pub roster_source: Arc<dyn RosterSource>,
    pub submitter: Arc<dyn SubmissionAdapter>,
    pub server_config: ServerConfig,
    pub wizard_config: WizardConfig,
}

impl AppState {
    pub fn new(
        calendar: TermCalendar,
        roster_source: Arc<dyn RosterSource>,
        submitter: Arc<dyn SubmissionAdapter>,
        server_config: ServerConfig,
        wizard_config: WizardConfig,
    ) -> Self {
        Self {
            wizards: Arc::new(WizardRegistry::new(
                wizard_config.max_open_wizards,
                wizard_config.idle_timeout,
            )),
            calendar: Arc::new(calendar),
            clock: clock_for(&wizard_config),
            roster_source,
            submitter,
            server_config,
            wizard_config,
        }
    }
}

/// A pinned reference date wins over the host clock.
pub fn clock_for(config: &WizardConfig) -> Arc<dyn Clock> {
    match config.reference_date {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    }
}

/// Fetch the term calendar, falling back to an empty one so the server can
/// still start while the school API is down. Calendar presets then resolve to
/// "no range" until a restart.
async fn load_calendar(source: &dyn RosterSource) -> TermCalendar {
    let sessions = match source.fetch_sessions_and_terms().await {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!(error = %e, "Term calendar unavailable, starting with an empty calendar");
            return TermCalendar::default();
        }
    };

    match TermCalendar::from_sessions(sessions) {
        Ok(calendar) => {
            info!(
                sessions = calendar.sessions().len(),
                "Term calendar loaded from school API"
            );
            calendar
        }
        Err(e) => {
            warn!(error = %e, "Rejected term calendar, starting with an empty calendar");
            TermCalendar::default()
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let server_config = ServerConfig::from_env();
    let upstream_config = UpstreamConfig::from_env();
    let wizard_config = WizardConfig::from_env();

    let client = Arc::new(UpstreamClient::new(&upstream_config)?);
    let calendar = load_calendar(client.as_ref()).await;

    Ok(AppState::new(
        calendar,
        client.clone(),
        client,
        server_config,
        wizard_config,
    ))
}
