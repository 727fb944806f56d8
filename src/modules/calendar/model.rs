use chrono::NaiveDate;
use rollbook_core::serde::{deserialize_optional_date, deserialize_optional_string};
use rollbook_models::{Frequency, Term, TermDates};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Query for a one-off range resolution, outside any wizard.
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ResolveQuery {
    pub frequency: Frequency,
    /// Academic session label, required by term, half-term and session presets
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub session: Option<String>,
    pub term: Option<Term>,
    /// Custom range start (YYYY-MM-DD)
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from: Option<NaiveDate>,
    /// Custom range end (YYYY-MM-DD)
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to: Option<NaiveDate>,
    /// Overrides the server's idea of today (YYYY-MM-DD)
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CurrentTermQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub today: Option<NaiveDate>,
}

/// The term in progress on `today`, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CurrentTermResponse {
    pub today: NaiveDate,
    pub session: Option<String>,
    pub term: Option<Term>,
    pub dates: Option<TermDates>,
}
