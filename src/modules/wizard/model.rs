//! Wizard state, request DTOs and response views.

use rollbook_calendar::DateRange;
use rollbook_models::{
    AttendanceStatus, AttendanceSummary, ClassId, Frequency, StudentAttendance, StudentId, Term,
    WizardId,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::machine::WizardController;

pub use rollbook_calendar::CustomPick;

/// Where a "create attendance" dialog currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Closed,
    Details,
    Range,
    Preview,
}

/// The in-progress attendance session. Attendance marks live in the wizard's
/// record store, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct WizardDraft {
    pub class_id: Option<ClassId>,
    /// Academic session label, e.g. `"2024/2025"`
    pub session: Option<String>,
    pub term: Option<Term>,
    pub frequency: Frequency,
    pub range: Option<DateRange>,
}

impl WizardDraft {
    pub fn details_complete(&self) -> bool {
        self.class_id.is_some() && self.session.is_some() && self.term.is_some()
    }
}

/// Payload handed to the submission adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSubmission {
    pub class_id: ClassId,
    pub session: String,
    pub term: Term,
    pub range: DateRange,
    pub records: Vec<StudentAttendance>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetClassDto {
    pub class_id: ClassId,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetSessionDto {
    #[validate(length(min = 1, max = 50, message = "session must be 1-50 characters"))]
    pub session: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetTermDto {
    pub term: Term,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetFrequencyDto {
    pub frequency: Frequency,
}

/// One roster row merged with its current mark.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentRecordView {
    pub student_id: StudentId,
    pub display_name: String,
    pub roll_number: String,
    pub status: AttendanceStatus,
    pub remarks: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WizardView {
    pub id: WizardId,
    pub step: WizardStep,
    pub can_advance: bool,
    pub can_submit: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub draft: WizardDraft,
    pub records: Vec<StudentRecordView>,
    pub summary: AttendanceSummary,
}

impl WizardView {
    pub fn new(id: WizardId, wizard: &WizardController) -> Self {
        let records = wizard
            .roster()
            .iter()
            .map(|entry| {
                let record = wizard.records().get(entry.student_id);
                StudentRecordView {
                    student_id: entry.student_id,
                    display_name: entry.display_name.clone(),
                    roll_number: entry.roll_number.clone(),
                    status: record.status,
                    remarks: record.remarks,
                }
            })
            .collect();

        Self {
            id,
            step: wizard.step(),
            can_advance: wizard.can_advance(),
            can_submit: wizard.can_submit(),
            loading: wizard.loading(),
            error: wizard.error().map(str::to_string),
            draft: wizard.draft().clone(),
            records,
            summary: wizard.records().summary(),
        }
    }
}
