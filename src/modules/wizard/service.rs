use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use rollbook_core::AppError;
use rollbook_models::{AttendancePatch, ClassId, Frequency, StudentId, Term, WizardId};

use crate::modules::wizard::machine::{SubmitStatus, WizardController};
use crate::modules::wizard::model::WizardView;
use crate::state::AppState;

#[derive(Debug)]
struct Entry {
    wizard: WizardController,
    last_touched: Instant,
}

impl Entry {
    /// Untouched for `idle_timeout` and not waiting on a submission.
    fn is_idle(&self, idle_timeout: Duration) -> bool {
        !self.wizard.loading() && self.last_touched.elapsed() >= idle_timeout
    }
}

/// Open wizards keyed by id.
///
/// The lock is only ever taken inside synchronous closures, so it is never
/// held across an upstream call. Wizards that end up closed are dropped, and
/// wizards left untouched for `idle_timeout` are evicted on the next insert
/// or lookup.
#[derive(Debug)]
pub struct WizardRegistry {
    wizards: Mutex<HashMap<WizardId, Entry>>,
    max_open: usize,
    idle_timeout: Duration,
}

impl WizardRegistry {
    pub fn new(max_open: usize, idle_timeout: Duration) -> Self {
        Self {
            wizards: Mutex::new(HashMap::new()),
            max_open,
            idle_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WizardId, Entry>> {
        self.wizards.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every idle wizard. Returns how many were evicted.
    pub fn evict_idle(&self) -> usize {
        Self::evict_idle_locked(&mut self.lock(), self.idle_timeout)
    }

    fn evict_idle_locked(wizards: &mut HashMap<WizardId, Entry>, idle_timeout: Duration) -> usize {
        let before = wizards.len();
        wizards.retain(|id, entry| {
            let idle = entry.is_idle(idle_timeout);
            if idle {
                info!(wizard_id = %id, "Idle attendance wizard evicted");
            }
            !idle
        });
        before - wizards.len()
    }

    pub fn insert(&self, id: WizardId, wizard: WizardController) -> Result<(), AppError> {
        let mut wizards = self.lock();
        Self::evict_idle_locked(&mut wizards, self.idle_timeout);
        if wizards.len() >= self.max_open {
            return Err(AppError::too_many_requests(anyhow!(
                "Too many open attendance wizards (limit {})",
                self.max_open
            )));
        }
        wizards.insert(
            id,
            Entry {
                wizard,
                last_touched: Instant::now(),
            },
        );
        Ok(())
    }

    /// Run `f` against wizard `id`, dropping the wizard afterwards if `f` closed it.
    pub fn with_wizard<R>(
        &self,
        id: WizardId,
        f: impl FnOnce(&mut WizardController) -> R,
    ) -> Result<R, AppError> {
        let mut wizards = self.lock();
        if wizards
            .get(&id)
            .is_some_and(|entry| entry.is_idle(self.idle_timeout))
        {
            wizards.remove(&id);
            info!(wizard_id = %id, "Idle attendance wizard evicted");
        }

        let entry = wizards
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(anyhow!("Attendance wizard {} not found", id)))?;

        entry.last_touched = Instant::now();
        let output = f(&mut entry.wizard);
        if !entry.wizard.is_open() {
            wizards.remove(&id);
            debug!(wizard_id = %id, "Closed wizard dropped");
        }
        Ok(output)
    }

    pub fn remove(&self, id: WizardId) -> Option<WizardController> {
        self.lock().remove(&id).map(|entry| entry.wizard)
    }
}

pub struct WizardService;

impl WizardService {
    /// Apply a synchronous transition and render the resulting view.
    fn transition(
        state: &AppState,
        id: WizardId,
        f: impl FnOnce(&mut WizardController),
    ) -> Result<WizardView, AppError> {
        state.wizards.with_wizard(id, |wizard| {
            f(wizard);
            WizardView::new(id, wizard)
        })
    }

    #[instrument(skip(state))]
    pub fn open_wizard(state: &AppState) -> Result<WizardView, AppError> {
        let mut wizard = WizardController::new(state.calendar.clone(), state.clock.clone());
        wizard.open();

        let id = WizardId::new();
        let view = WizardView::new(id, &wizard);
        state.wizards.insert(id, wizard)?;

        info!(wizard_id = %id, "Attendance wizard opened");
        Ok(view)
    }

    #[instrument(skip(state))]
    pub fn get_wizard(state: &AppState, id: WizardId) -> Result<WizardView, AppError> {
        state
            .wizards
            .with_wizard(id, |wizard| WizardView::new(id, wizard))
    }

    /// Cancel from any state. An in-flight submission for this wizard will
    /// find it gone and be discarded.
    #[instrument(skip(state))]
    pub fn cancel_wizard(state: &AppState, id: WizardId) -> Result<(), AppError> {
        let mut wizard = state
            .wizards
            .remove(id)
            .ok_or_else(|| AppError::not_found(anyhow!("Attendance wizard {} not found", id)))?;
        wizard.cancel();

        info!(wizard_id = %id, "Attendance wizard cancelled");
        Ok(())
    }

    #[instrument(skip(state))]
    pub fn reset(state: &AppState, id: WizardId) -> Result<WizardView, AppError> {
        Self::transition(state, id, WizardController::reset)
    }

    #[instrument(skip(state))]
    pub fn advance(state: &AppState, id: WizardId) -> Result<WizardView, AppError> {
        Self::transition(state, id, |wizard| {
            if !wizard.advance() {
                debug!(step = ?wizard.step(), "Advance ignored, step incomplete");
            }
        })
    }

    #[instrument(skip(state))]
    pub fn back(state: &AppState, id: WizardId) -> Result<WizardView, AppError> {
        Self::transition(state, id, |wizard| {
            wizard.back();
        })
    }

    /// Select the class and seed the record store from its roster.
    ///
    /// The roster is fetched without holding the registry lock and only
    /// applied if the wizard still points at the same class afterwards.
    #[instrument(skip(state))]
    pub async fn set_class(
        state: &AppState,
        id: WizardId,
        class_id: ClassId,
    ) -> Result<WizardView, AppError> {
        let needs_roster = state.wizards.with_wizard(id, |wizard| {
            wizard.set_class(class_id);
            // Ignored while submitting, in which case the class did not change.
            wizard.is_open()
                && !wizard.loading()
                && wizard.draft().class_id == Some(class_id)
                && wizard.roster().is_empty()
        })?;

        if !needs_roster {
            return Self::get_wizard(state, id);
        }

        let roster = state
            .roster_source
            .fetch_roster(class_id)
            .await
            .map_err(|e| {
                warn!(class_id = %class_id, error = %e, "Roster fetch failed");
                AppError::bad_gateway(e)
            })?;

        state.wizards.with_wizard(id, |wizard| {
            if wizard.draft().class_id == Some(class_id) {
                debug!(students = roster.len(), "Roster loaded");
                wizard.load_roster(roster);
            } else {
                debug!("Class changed while the roster was loading, dropping it");
            }
            WizardView::new(id, wizard)
        })
    }

    #[instrument(skip(state))]
    pub fn set_session(
        state: &AppState,
        id: WizardId,
        session: String,
    ) -> Result<WizardView, AppError> {
        Self::transition(state, id, |wizard| wizard.set_session(session))
    }

    #[instrument(skip(state))]
    pub fn set_term(state: &AppState, id: WizardId, term: Term) -> Result<WizardView, AppError> {
        Self::transition(state, id, |wizard| wizard.set_term(term))
    }

    #[instrument(skip(state))]
    pub fn set_frequency(
        state: &AppState,
        id: WizardId,
        frequency: Frequency,
    ) -> Result<WizardView, AppError> {
        Self::transition(state, id, |wizard| wizard.set_frequency(frequency))
    }

    #[instrument(skip(state))]
    pub fn set_custom_range(
        state: &AppState,
        id: WizardId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<WizardView, AppError> {
        if from > to {
            return Err(AppError::bad_request(anyhow!(
                "Range starts on {} after it ends on {}",
                from,
                to
            )));
        }
        Self::transition(state, id, |wizard| wizard.set_custom_range(from, to))
    }

    #[instrument(skip(state))]
    pub fn update_record(
        state: &AppState,
        id: WizardId,
        student_id: StudentId,
        patch: AttendancePatch,
    ) -> Result<WizardView, AppError> {
        state
            .wizards
            .with_wizard(id, |wizard| {
                wizard
                    .update_record(student_id, patch)
                    .map(|()| WizardView::new(id, wizard))
            })?
            .map_err(AppError::not_found)
    }

    #[instrument(skip(state))]
    pub fn mark_all_present(state: &AppState, id: WizardId) -> Result<WizardView, AppError> {
        Self::transition(state, id, WizardController::mark_all_present)
    }

    /// Send the previewed draft upstream.
    ///
    /// The registry lock is released while the school API call is in flight.
    /// On failure the draft stays in Preview and the caller gets a 502.
    #[instrument(skip(state))]
    pub async fn submit(state: &AppState, id: WizardId) -> Result<WizardView, AppError> {
        let pending = state.wizards.with_wizard(id, |wizard| {
            wizard
                .begin_submit()
                .ok_or_else(|| WizardView::new(id, wizard))
        })?;

        let pending = match pending {
            Ok(pending) => pending,
            Err(unchanged) => {
                debug!("Submit ignored, wizard is not ready");
                return Ok(unchanged);
            }
        };

        let result = state
            .submitter
            .submit_attendance(&pending.payload)
            .await;

        let settled = state.wizards.with_wizard(id, |wizard| {
            let status = wizard.finish_submit(pending.ticket, result);
            (status, WizardView::new(id, wizard))
        });

        match settled {
            Ok((SubmitStatus::Failed, view)) => Err(AppError::bad_gateway(anyhow!(
                "{}",
                view.error
                    .unwrap_or_else(|| "Attendance submission failed".to_string())
            ))),
            Ok((_, view)) => Ok(view),
            Err(e) => {
                info!(wizard_id = %id, "Wizard was cancelled during submission, result discarded");
                Err(e)
            }
        }
    }
}
