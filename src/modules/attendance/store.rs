use std::collections::HashMap;

use rollbook_models::{
    AttendancePatch, AttendanceRecord, AttendanceStatus, AttendanceSummary, StudentAttendance,
    StudentId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    #[error("student {0} is not on the loaded roster")]
    UnknownStudent(StudentId),
}

/// One [`AttendanceRecord`] per rostered student, in roster order.
///
/// Owned by a single wizard for the lifetime of its dialog.
#[derive(Debug, Clone, Default)]
pub struct AttendanceRecordStore {
    order: Vec<StudentId>,
    records: HashMap<StudentId, AttendanceRecord>,
}

impl AttendanceRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every id as absent with no remarks, replacing any earlier record
    /// for that id. Ids not in `student_ids` are kept.
    pub fn initialize<I>(&mut self, student_ids: I)
    where
        I: IntoIterator<Item = StudentId>,
    {
        for id in student_ids {
            if self
                .records
                .insert(id, AttendanceRecord::default())
                .is_none()
            {
                self.order.push(id);
            }
        }
    }

    /// Merge `patch` into the record for `student_id`.
    ///
    /// An id that was never initialized leaves the store untouched.
    pub fn update(
        &mut self,
        student_id: StudentId,
        patch: AttendancePatch,
    ) -> Result<(), AttendanceError> {
        let record = self
            .records
            .get_mut(&student_id)
            .ok_or(AttendanceError::UnknownStudent(student_id))?;
        patch.apply_to(record);
        Ok(())
    }

    /// Mark every known student present. Remarks are left alone.
    pub fn mark_all_present(&mut self) {
        for record in self.records.values_mut() {
            record.status = AttendanceStatus::Present;
        }
    }

    /// The current record, or a fresh absent record for an unknown id.
    pub fn get(&self, student_id: StudentId) -> AttendanceRecord {
        self.records.get(&student_id).cloned().unwrap_or_default()
    }

    pub fn contains(&self, student_id: StudentId) -> bool {
        self.records.contains_key(&student_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (StudentId, &AttendanceRecord)> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|record| (*id, record)))
    }

    pub fn summary(&self) -> AttendanceSummary {
        let mut summary = AttendanceSummary::default();
        for (_, record) in self.iter() {
            summary.count(record.status);
        }
        summary
    }

    /// Flattened rows for submission, in roster order.
    pub fn entries(&self) -> Vec<StudentAttendance> {
        self.iter()
            .map(|(student_id, record)| StudentAttendance {
                student_id,
                status: record.status,
                remarks: record.remarks.clone(),
            })
            .collect()
    }
}
