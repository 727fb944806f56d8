//! The "create attendance" wizard state machine.
//!
//! ```text
//! Closed ──open──▶ Details ──advance──▶ Range ──advance──▶ Preview ──submit ok──▶ Closed
//!    ▲                          (class, session           (range resolved)
//!    └──────── cancel ────────── and term set)
//! ```
//!
//! Gated calls (`advance` with missing fields, `submit` with nothing to
//! create) are silent no-ops. The draft is frozen while a submission is in
//! flight: setters and record edits are ignored until it settles. `cancel` is honoured from any state, even while
//! a submission is in flight; the late answer is then discarded because its
//! ticket no longer matches the draft generation.

use std::sync::Arc;

use chrono::NaiveDate;
use rollbook_calendar::{Clock, RangeResolver, ResolveContext, TermCalendar};
use rollbook_models::{AttendancePatch, ClassId, Frequency, RosterEntry, StudentId, Term};
use tracing::{debug, info, warn};

use super::model::{AttendanceSubmission, WizardDraft, WizardStep};
use crate::modules::attendance::{AttendanceError, AttendanceRecordStore};
use crate::modules::upstream::{SubmissionAdapter, UpstreamError};

/// Identifies the draft a submission was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub payload: AttendanceSubmission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Not in Preview, already submitting, or no school days to create.
    Blocked,
    Submitted,
    /// The adapter failed; the draft is kept for a retry.
    Failed,
    /// The wizard was cancelled, reset or reopened while the call was out.
    Discarded,
}

#[derive(Debug)]
pub struct WizardController {
    calendar: Arc<TermCalendar>,
    clock: Arc<dyn Clock>,
    step: WizardStep,
    draft: WizardDraft,
    records: AttendanceRecordStore,
    roster: Vec<RosterEntry>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl WizardController {
    /// A closed wizard over a shared, read-only term calendar.
    pub fn new(calendar: Arc<TermCalendar>, clock: Arc<dyn Clock>) -> Self {
        Self {
            calendar,
            clock,
            step: WizardStep::Closed,
            draft: WizardDraft::default(),
            records: AttendanceRecordStore::new(),
            roster: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_open(&self) -> bool {
        self.step != WizardStep::Closed
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn records(&self) -> &AttendanceRecordStore {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut AttendanceRecordStore {
        &mut self.records
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Open and not waiting on a submission.
    fn editable(&self) -> bool {
        self.is_open() && !self.loading
    }

    fn discard_draft(&mut self) {
        self.draft = WizardDraft::default();
        self.records.clear();
        self.roster.clear();
        self.loading = false;
        self.error = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// `Closed → Details` with an empty draft. No-op when already open.
    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.discard_draft();
        self.step = WizardStep::Details;
        debug!("Wizard opened");
    }

    /// Close from any state and drop the draft.
    pub fn cancel(&mut self) {
        if self.loading {
            warn!("Wizard cancelled with a submission in flight");
        }
        self.discard_draft();
        self.step = WizardStep::Closed;
    }

    /// Drop the draft and start over at Details. A closed wizard stays closed.
    pub fn reset(&mut self) {
        self.discard_draft();
        if self.is_open() {
            self.step = WizardStep::Details;
        }
    }

    /// Select the class. Records from a previous class are dropped until
    /// [`load_roster`](Self::load_roster) seeds the new one, and a wizard
    /// past Details goes back there.
    pub fn set_class(&mut self, class_id: ClassId) {
        if !self.editable() || self.draft.class_id == Some(class_id) {
            return;
        }
        self.draft.class_id = Some(class_id);
        self.records.clear();
        self.roster.clear();
        self.error = None;
        if self.step != WizardStep::Details {
            debug!(step = ?self.step, "Class changed, back to Details");
            self.step = WizardStep::Details;
        }
    }

    /// Seed a fresh record store from the class roster, everyone absent.
    pub fn load_roster(&mut self, roster: Vec<RosterEntry>) {
        if !self.editable() {
            return;
        }
        self.records.clear();
        self.records
            .initialize(roster.iter().map(|entry| entry.student_id));
        self.roster = roster;
    }

    pub fn set_session(&mut self, session: impl Into<String>) {
        if !self.editable() {
            return;
        }
        self.draft.session = Some(session.into());
        if self.draft.frequency.is_calendar_based() {
            self.refresh_range();
        }
    }

    /// Select the term and default the range to that term.
    pub fn set_term(&mut self, term: Term) {
        if !self.editable() {
            return;
        }
        self.draft.term = Some(term);
        self.draft.frequency = Frequency::Term;
        self.refresh_range();
    }

    /// Switch preset. `Custom` keeps the current range until a pick arrives.
    pub fn set_frequency(&mut self, frequency: Frequency) {
        if !self.editable() {
            return;
        }
        self.draft.frequency = frequency;
        if frequency != Frequency::Custom {
            self.refresh_range();
        }
    }

    /// Apply a calendar pick. An inverted pick is ignored and the previous
    /// range kept.
    pub fn set_custom_range(&mut self, from: NaiveDate, to: NaiveDate) {
        if !self.editable() {
            return;
        }
        let resolved = RangeResolver::new(&self.calendar).resolve(
            Frequency::Custom,
            self.clock.today(),
            ResolveContext::custom(from, to),
        );
        match resolved {
            Ok(range) => {
                self.draft.frequency = Frequency::Custom;
                self.draft.range = Some(range);
            }
            Err(e) => debug!(error = %e, "Ignoring custom range pick"),
        }
    }

    fn refresh_range(&mut self) {
        let ctx = ResolveContext {
            session: self.draft.session.as_deref(),
            term: self.draft.term,
            custom: None,
        };
        let resolved = RangeResolver::new(&self.calendar).resolve(
            self.draft.frequency,
            self.clock.today(),
            ctx,
        );

        match resolved {
            Ok(range) => self.draft.range = Some(range),
            Err(e) => debug!(
                frequency = %self.draft.frequency,
                error = %e,
                "No range for selection, keeping previous range"
            ),
        }
    }

    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Details => self.draft.details_complete(),
            WizardStep::Range => self.draft.range.is_some(),
            WizardStep::Closed | WizardStep::Preview => false,
        }
    }

    /// Move one step forward when the current step is complete. Returns
    /// whether the step changed.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.step = match self.step {
            WizardStep::Details => WizardStep::Range,
            WizardStep::Range => WizardStep::Preview,
            other => other,
        };
        debug!(step = ?self.step, "Wizard advanced");
        true
    }

    /// Move one step back. Not available while submitting.
    pub fn back(&mut self) -> bool {
        if self.loading {
            return false;
        }
        let previous = match self.step {
            WizardStep::Range => WizardStep::Details,
            WizardStep::Preview => WizardStep::Range,
            WizardStep::Closed | WizardStep::Details => return false,
        };
        self.step = previous;
        true
    }

    /// Patch one record. Ignored while a submission is in flight.
    pub fn update_record(
        &mut self,
        student_id: StudentId,
        patch: AttendancePatch,
    ) -> Result<(), AttendanceError> {
        if self.loading {
            debug!(student_id = %student_id, "Record edit ignored while submitting");
            return Ok(());
        }
        self.records.update(student_id, patch)
    }

    pub fn mark_all_present(&mut self) {
        if self.loading {
            return;
        }
        self.records.mark_all_present();
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Preview
            && !self.loading
            && self.draft.details_complete()
            && !self.roster.is_empty()
            && self.draft.range.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Start a submission: flags `loading` and snapshots the draft.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if !self.can_submit() {
            return None;
        }

        let draft = &self.draft;
        let payload = AttendanceSubmission {
            class_id: draft.class_id?,
            session: draft.session.clone()?,
            term: draft.term?,
            range: draft.range.clone()?,
            records: self.records.entries(),
        };

        self.loading = true;
        self.error = None;

        Some(PendingSubmission {
            ticket: SubmissionTicket {
                generation: self.generation,
            },
            payload,
        })
    }

    /// Settle a submission started by [`begin_submit`](Self::begin_submit).
    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<(), UpstreamError>,
    ) -> SubmitStatus {
        if ticket.generation != self.generation || !self.loading {
            debug!("Discarding stale submission result");
            return SubmitStatus::Discarded;
        }
        self.loading = false;

        match result {
            Ok(()) => {
                info!(
                    class_id = ?self.draft.class_id,
                    students = self.records.len(),
                    "Attendance session submitted"
                );
                self.discard_draft();
                self.step = WizardStep::Closed;
                SubmitStatus::Submitted
            }
            Err(e) => {
                warn!(error = %e, "Attendance submission failed");
                self.error = Some(e.to_string());
                SubmitStatus::Failed
            }
        }
    }

    /// Submit through `adapter` and settle the outcome in one call.
    pub async fn submit(&mut self, adapter: &dyn SubmissionAdapter) -> SubmitStatus {
        let Some(pending) = self.begin_submit() else {
            return SubmitStatus::Blocked;
        };
        let result = adapter.submit_attendance(&pending.payload).await;
        self.finish_submit(pending.ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rollbook_calendar::FixedClock;
    use rollbook_models::{
        AcademicSessionTerms, AttendanceStatus, SessionTerms, TermDateRange, TermDates,
    };
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> Arc<TermCalendar> {
        let terms = AcademicSessionTerms {
            sessions: vec![SessionTerms {
                label: "2024/2025".to_string(),
                terms: TermDateRange {
                    first: Some(TermDates {
                        start: date(2025, 9, 10),
                        end: date(2025, 12, 5),
                    }),
                    second: None,
                    third: None,
                },
            }],
        };
        Arc::new(TermCalendar::from_sessions(terms).unwrap())
    }

    fn wizard() -> WizardController {
        WizardController::new(calendar(), Arc::new(FixedClock(date(2025, 9, 15))))
    }

    fn roster(n: u128) -> Vec<RosterEntry> {
        (1..=n)
            .map(|i| RosterEntry {
                student_id: StudentId::from_u128(i),
                display_name: format!("Student {i}"),
                roll_number: format!("{i:03}"),
            })
            .collect()
    }

    #[derive(Default)]
    struct RecordingAdapter {
        fail: bool,
        submissions: Mutex<Vec<AttendanceSubmission>>,
    }

    #[async_trait]
    impl SubmissionAdapter for RecordingAdapter {
        async fn submit_attendance(
            &self,
            submission: &AttendanceSubmission,
        ) -> Result<(), UpstreamError> {
            self.submissions.lock().unwrap().push(submission.clone());
            if self.fail {
                Err(UpstreamError::Rejected {
                    status: 503,
                    message: "maintenance".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    /// Open, fill Details for class c1 / 2024/2025 / first term and seed a roster.
    fn filled() -> WizardController {
        let mut wizard = wizard();
        wizard.open();
        wizard.set_class(ClassId::from_u128(0xc1));
        wizard.load_roster(roster(3));
        wizard.set_session("2024/2025");
        wizard.set_term(Term::First);
        wizard
    }

    #[test]
    fn test_starts_closed_and_ignores_setters() {
        let mut wizard = wizard();
        assert_eq!(wizard.step(), WizardStep::Closed);

        wizard.set_class(ClassId::new());
        wizard.set_term(Term::First);
        assert_eq!(wizard.draft(), &WizardDraft::default());
        assert!(!wizard.advance());
    }

    #[test]
    fn test_details_gate() {
        let mut wizard = wizard();
        wizard.open();
        wizard.set_class(ClassId::new());

        assert!(!wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Details);

        wizard.set_session("2024/2025");
        wizard.set_term(Term::First);
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Range);
    }

    #[test]
    fn test_set_term_resolves_default_range_without_advancing() {
        let wizard = filled();
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.draft().frequency, Frequency::Term);

        let range = wizard.draft().range.as_ref().unwrap();
        assert_eq!(range.from(), date(2025, 9, 15));
        assert_eq!(range.to(), date(2025, 12, 5));
        assert!(range.valid_days().iter().all(|d| {
            use chrono::{Datelike, Weekday};
            !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
        }));
    }

    #[test]
    fn test_lookup_miss_keeps_range_untouched() {
        let mut wizard = wizard();
        wizard.open();
        wizard.set_session("1999/2000");
        wizard.set_term(Term::Second);
        assert!(wizard.draft().range.is_none());

        wizard.set_session("2024/2025");
        wizard.set_term(Term::First);
        let before = wizard.draft().range.clone();
        assert!(before.is_some());

        wizard.set_term(Term::Third);
        assert_eq!(wizard.draft().range, before);
        assert_eq!(wizard.draft().term, Some(Term::Third));
    }

    #[test]
    fn test_frequency_and_custom_range() {
        let mut wizard = filled();

        wizard.set_frequency(Frequency::Rolling7);
        assert_eq!(wizard.draft().range.as_ref().unwrap().valid_days().len(), 7);

        // Custom freezes the current range.
        let frozen = wizard.draft().range.clone();
        wizard.set_frequency(Frequency::Custom);
        assert_eq!(wizard.draft().range, frozen);

        wizard.set_custom_range(date(2025, 10, 6), date(2025, 10, 10));
        assert_eq!(wizard.draft().range.as_ref().unwrap().valid_days().len(), 5);

        // Inverted pick is ignored.
        wizard.set_custom_range(date(2025, 10, 10), date(2025, 10, 6));
        assert_eq!(wizard.draft().range.as_ref().unwrap().from(), date(2025, 10, 6));
        assert_eq!(wizard.draft().frequency, Frequency::Custom);
    }

    #[test]
    fn test_back_steps() {
        let mut wizard = filled();
        assert!(!wizard.back());
        wizard.advance();
        wizard.advance();
        assert_eq!(wizard.step(), WizardStep::Preview);
        assert!(!wizard.advance());

        assert!(wizard.back());
        assert_eq!(wizard.step(), WizardStep::Range);
        assert!(wizard.back());
        assert_eq!(wizard.step(), WizardStep::Details);
    }

    #[test]
    fn test_weekend_only_range_blocks_submission() {
        let mut wizard = filled();
        wizard.advance();
        wizard.set_custom_range(date(2025, 9, 20), date(2025, 9, 21));
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Preview);

        assert!(!wizard.can_submit());
        assert!(wizard.begin_submit().is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_submit_closes_and_clears() {
        let mut wizard = filled();
        assert!(wizard.advance());
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Preview);

        wizard.mark_all_present();
        wizard
            .update_record(
                StudentId::from_u128(2),
                AttendancePatch::status(AttendanceStatus::Late),
            )
            .unwrap();

        let adapter = RecordingAdapter::default();
        assert_eq!(wizard.submit(&adapter).await, SubmitStatus::Submitted);

        assert_eq!(wizard.step(), WizardStep::Closed);
        assert_eq!(wizard.draft(), &WizardDraft::default());
        assert!(wizard.records().is_empty());
        assert!(!wizard.loading());

        let sent = adapter.submissions.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].session, "2024/2025");
        assert_eq!(sent[0].range.from(), date(2025, 9, 15));
        assert_eq!(sent[0].records.len(), 3);
        assert_eq!(sent[0].records[0].status, AttendanceStatus::Present);
        assert_eq!(sent[0].records[1].status, AttendanceStatus::Late);
    }

    #[test]
    fn test_failed_submit_keeps_draft_for_retry() {
        let mut wizard = filled();
        wizard.advance();
        wizard.advance();

        let failing = RecordingAdapter {
            fail: true,
            ..Default::default()
        };
        let status = tokio_test::block_on(wizard.submit(&failing));
        assert_eq!(status, SubmitStatus::Failed);
        assert_eq!(wizard.step(), WizardStep::Preview);
        assert!(wizard.error().unwrap().contains("503"));
        assert!(wizard.draft().range.is_some());
        assert_eq!(wizard.records().len(), 3);

        let ok = RecordingAdapter::default();
        assert_eq!(
            tokio_test::block_on(wizard.submit(&ok)),
            SubmitStatus::Submitted
        );
    }

    #[test]
    fn test_cancel_during_submission_discards_late_result() {
        let mut wizard = filled();
        wizard.advance();
        wizard.advance();

        let pending = wizard.begin_submit().unwrap();
        assert!(wizard.loading());
        assert!(wizard.begin_submit().is_none());

        wizard.cancel();
        assert_eq!(wizard.step(), WizardStep::Closed);
        assert_eq!(wizard.draft(), &WizardDraft::default());
        assert!(!wizard.loading());

        assert_eq!(
            wizard.finish_submit(pending.ticket, Ok(())),
            SubmitStatus::Discarded
        );
        assert_eq!(wizard.step(), WizardStep::Closed);
    }

    #[test]
    fn test_draft_is_frozen_while_submitting() {
        let mut wizard = filled();
        wizard.advance();
        wizard.advance();
        let before = wizard.draft().clone();

        let pending = wizard.begin_submit().unwrap();
        wizard.set_class(ClassId::from_u128(0xc2));
        wizard.set_session("2025/2026");
        wizard.set_term(Term::Second);
        wizard.set_frequency(Frequency::Rolling7);
        wizard.set_custom_range(date(2025, 10, 6), date(2025, 10, 10));
        wizard.load_roster(roster(1));
        wizard.mark_all_present();
        wizard
            .update_record(
                StudentId::from_u128(1),
                AttendancePatch::status(AttendanceStatus::Late),
            )
            .unwrap();
        assert!(!wizard.back());

        assert_eq!(wizard.draft(), &before);
        assert_eq!(wizard.step(), WizardStep::Preview);
        assert_eq!(wizard.records().len(), 3);
        assert!(
            wizard
                .records()
                .entries()
                .iter()
                .all(|r| r.status == AttendanceStatus::Absent)
        );

        let failed = Err(UpstreamError::Rejected {
            status: 503,
            message: "maintenance".to_string(),
        });
        assert_eq!(
            wizard.finish_submit(pending.ticket, failed),
            SubmitStatus::Failed
        );
        assert!(wizard.can_submit());

        let retry = wizard.begin_submit().unwrap();
        assert_eq!(retry.payload.class_id, ClassId::from_u128(0xc1));
        assert_eq!(retry.payload.records.len(), 3);
    }

    #[test]
    fn test_class_change_returns_to_details() {
        let mut wizard = filled();
        wizard.advance();
        wizard.advance();

        // Re-selecting the same class is not a change.
        wizard.set_class(ClassId::from_u128(0xc1));
        assert_eq!(wizard.step(), WizardStep::Preview);
        assert_eq!(wizard.records().len(), 3);

        wizard.set_class(ClassId::from_u128(0xc2));
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.draft().class_id, Some(ClassId::from_u128(0xc2)));
        assert!(wizard.records().is_empty());
        assert!(wizard.roster().is_empty());
        assert!(!wizard.can_submit());
    }

    #[test]
    fn test_submit_needs_loaded_roster() {
        let mut wizard = wizard();
        wizard.open();
        wizard.set_class(ClassId::from_u128(0xc1));
        wizard.set_session("2024/2025");
        wizard.set_term(Term::First);
        assert!(wizard.advance());
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Preview);

        assert!(!wizard.can_submit());
        assert!(wizard.begin_submit().is_none());

        wizard.load_roster(roster(2));
        assert!(wizard.can_submit());
    }

    #[test]
    fn test_reopen_starts_from_empty_draft() {
        let mut wizard = filled();
        wizard.cancel();
        wizard.open();
        assert_eq!(wizard.step(), WizardStep::Details);
        assert_eq!(wizard.draft(), &WizardDraft::default());
        assert!(wizard.roster().is_empty());
    }

    #[test]
    fn test_reset_returns_to_details() {
        let mut wizard = filled();
        wizard.advance();
        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::Details);
        assert!(wizard.draft().range.is_none());

        let mut closed = self::wizard();
        closed.reset();
        assert_eq!(closed.step(), WizardStep::Closed);
    }
}
