//! Frequency presets for deriving an attendance date range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// A named rule for turning "today" (and possibly the selected term) into a
/// date range. `Custom` means the range comes from explicit calendar picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Frequency {
    /// From today to the end of the current (Monday-start) week.
    #[serde(rename = "week")]
    Week,
    /// The next five business days starting today.
    #[serde(rename = "business-week")]
    BusinessWeek,
    /// From today to the last day of the month.
    #[serde(rename = "month")]
    Month,
    /// The next seven business days starting today.
    #[serde(rename = "rolling-7")]
    Rolling7,
    /// Monday to Friday of next week.
    #[serde(rename = "next-week")]
    NextWeek,
    /// The next thirty business days starting today.
    #[serde(rename = "rolling-30")]
    Rolling30,
    /// The selected term, starting today when today falls inside it.
    #[default]
    #[serde(rename = "term")]
    Term,
    /// First half of the selected term.
    #[serde(rename = "half-term")]
    HalfTerm,
    /// The whole academic session, first term start to third term end.
    #[serde(rename = "session")]
    Session,
    #[serde(rename = "custom")]
    Custom,
}

impl Frequency {
    pub const ALL: [Frequency; 10] = [
        Frequency::Week,
        Frequency::BusinessWeek,
        Frequency::Month,
        Frequency::Rolling7,
        Frequency::NextWeek,
        Frequency::Rolling30,
        Frequency::Term,
        Frequency::HalfTerm,
        Frequency::Session,
        Frequency::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Week => "week",
            Frequency::BusinessWeek => "business-week",
            Frequency::Month => "month",
            Frequency::Rolling7 => "rolling-7",
            Frequency::NextWeek => "next-week",
            Frequency::Rolling30 => "rolling-30",
            Frequency::Term => "term",
            Frequency::HalfTerm => "half-term",
            Frequency::Session => "session",
            Frequency::Custom => "custom",
        }
    }

    /// Presets that read the term calendar rather than only "today".
    pub fn is_calendar_based(self) -> bool {
        matches!(
            self,
            Frequency::Term | Frequency::HalfTerm | Frequency::Session
        )
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown frequency `{0}`")]
pub struct ParseFrequencyError(pub String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or(ParseFrequencyError(wanted))
    }
}
