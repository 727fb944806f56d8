use std::fs;
use std::path::Path;

use anyhow::Context;
use rollbook_calendar::TermCalendar;
use rollbook_models::AcademicSessionTerms;
use validator::Validate;

/// Parse and validate a calendar in the `GET /academic-sessions/terms` shape.
pub fn parse_calendar(json: &str) -> anyhow::Result<TermCalendar> {
    let sessions: AcademicSessionTerms =
        serde_json::from_str(json).context("Calendar is not valid JSON")?;
    sessions.validate().context("Calendar failed validation")?;
    Ok(TermCalendar::from_sessions(sessions)?)
}

pub fn load_calendar(path: &Path) -> anyhow::Result<TermCalendar> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read calendar file {}", path.display()))?;
    parse_calendar(&json)
}
