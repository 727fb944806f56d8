//! Per-student attendance models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::StudentId;

/// A student's mark for the session. New records start as `Absent` so a
/// teacher has to actively mark presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
    Late,
    Excused,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub status: AttendanceStatus,
    pub remarks: String,
}

/// Partial update for one [`AttendanceRecord`]; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct AttendancePatch {
    pub status: Option<AttendanceStatus>,
    #[validate(length(max = 500, message = "remarks must be at most 500 characters"))]
    pub remarks: Option<String>,
}

impl AttendancePatch {
    pub fn status(status: AttendanceStatus) -> Self {
        Self {
            status: Some(status),
            remarks: None,
        }
    }

    pub fn remarks(remarks: impl Into<String>) -> Self {
        Self {
            status: None,
            remarks: Some(remarks.into()),
        }
    }

    pub fn apply_to(self, record: &mut AttendanceRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(remarks) = self.remarks {
            record.remarks = remarks;
        }
    }
}

/// One row of a class roster as returned by the school API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RosterEntry {
    pub student_id: StudentId,
    pub display_name: String,
    #[serde(default)]
    pub roll_number: String,
}

/// A record flattened with its student id, as submitted upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentAttendance {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    pub remarks: String,
}

/// Head-count per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
}

impl AttendanceSummary {
    pub fn count(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.present + self.absent + self.late + self.excused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_absent_without_remarks() {
        let record = AttendanceRecord::default();
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert!(record.remarks.is_empty());
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut record = AttendanceRecord {
            status: AttendanceStatus::Late,
            remarks: "bus delay".to_string(),
        };

        AttendancePatch::status(AttendanceStatus::Present).apply_to(&mut record);
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.remarks, "bus delay");

        AttendancePatch::remarks("").apply_to(&mut record);
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.remarks, "");
    }

    #[test]
    fn test_patch_validation() {
        let long = AttendancePatch::remarks("x".repeat(501));
        assert!(long.validate().is_err());

        let patch: AttendancePatch = serde_json::from_str(r#"{"status": "excused"}"#).unwrap();
        assert!(patch.validate().is_ok());
        assert_eq!(patch.status, Some(AttendanceStatus::Excused));
        assert!(patch.remarks.is_none());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = AttendanceSummary::default();
        summary.count(AttendanceStatus::Present);
        summary.count(AttendanceStatus::Present);
        summary.count(AttendanceStatus::Late);
        assert_eq!(summary.present, 2);
        assert_eq!(summary.total(), 3);
    }
}
