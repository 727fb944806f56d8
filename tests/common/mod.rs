#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use http_body_util::BodyExt;
use rollbook::modules::upstream::{RosterSource, SubmissionAdapter, UpstreamError};
use rollbook::modules::wizard::model::AttendanceSubmission;
use rollbook::router::init_router;
use rollbook::state::AppState;
use rollbook_calendar::TermCalendar;
use rollbook_config::{ServerConfig, WizardConfig};
use rollbook_models::{
    AcademicSessionTerms, ClassId, RosterEntry, SessionTerms, StudentId, TermDateRange, TermDates,
};
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

pub const SESSION: &str = "2024/2025";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The server's pinned "today", a Monday inside the first term.
pub fn today() -> NaiveDate {
    date(2025, 9, 15)
}

pub fn sample_sessions() -> AcademicSessionTerms {
    AcademicSessionTerms {
        sessions: vec![SessionTerms {
            label: SESSION.to_string(),
            terms: TermDateRange {
                first: Some(TermDates {
                    start: date(2025, 9, 10),
                    end: date(2025, 12, 5),
                }),
                second: Some(TermDates {
                    start: date(2026, 1, 5),
                    end: date(2026, 3, 27),
                }),
                third: Some(TermDates {
                    start: date(2026, 4, 20),
                    end: date(2026, 7, 17),
                }),
            },
        }],
    }
}

pub fn class_a() -> ClassId {
    ClassId::from_u128(0xa)
}

pub fn class_b() -> ClassId {
    ClassId::from_u128(0xb)
}

pub fn fake_roster(first_id: u128, students: usize) -> Vec<RosterEntry> {
    (0..students)
        .map(|i| {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            RosterEntry {
                student_id: StudentId::from_u128(first_id + i as u128),
                display_name: format!("{} {}", first, last),
                roll_number: format!("{:03}", i + 1),
            }
        })
        .collect()
}

/// In-memory school API.
#[derive(Default)]
pub struct StubSchoolApi {
    pub rosters: HashMap<ClassId, Vec<RosterEntry>>,
    pub submissions: Mutex<Vec<AttendanceSubmission>>,
    pub fail_submissions: bool,
    /// When set, submissions signal `started` and wait for `release`.
    pub hold_submissions: bool,
    pub started: Notify,
    pub release: Notify,
}

impl StubSchoolApi {
    pub fn new() -> Self {
        let mut rosters = HashMap::new();
        rosters.insert(class_a(), fake_roster(1, 3));
        rosters.insert(class_b(), fake_roster(100, 2));
        Self {
            rosters,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_submissions: true,
            ..Self::new()
        }
    }

    pub fn holding() -> Self {
        Self {
            hold_submissions: true,
            ..Self::new()
        }
    }

    pub fn submitted(&self) -> Vec<AttendanceSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RosterSource for StubSchoolApi {
    async fn fetch_roster(&self, class_id: ClassId) -> Result<Vec<RosterEntry>, UpstreamError> {
        self.rosters
            .get(&class_id)
            .cloned()
            .ok_or_else(|| UpstreamError::Rejected {
                status: 404,
                message: format!("class {} not found", class_id),
            })
    }

    async fn fetch_sessions_and_terms(&self) -> Result<AcademicSessionTerms, UpstreamError> {
        Ok(sample_sessions())
    }
}

#[async_trait]
impl SubmissionAdapter for StubSchoolApi {
    async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<(), UpstreamError> {
        if self.hold_submissions {
            self.started.notify_one();
            self.release.notified().await;
        }

        self.submissions.lock().unwrap().push(submission.clone());

        if self.fail_submissions {
            Err(UpstreamError::Rejected {
                status: 503,
                message: "attendance service unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

pub fn setup_test_app_with(api: Arc<StubSchoolApi>, max_open_wizards: usize) -> axum::Router {
    let calendar = TermCalendar::from_sessions(sample_sessions()).unwrap();
    let state = AppState::new(
        calendar,
        api.clone(),
        api,
        ServerConfig::default(),
        WizardConfig {
            max_open_wizards,
            reference_date: Some(today()),
            ..WizardConfig::default()
        },
    );
    init_router(state)
}

pub fn setup_test_app(api: Arc<StubSchoolApi>) -> axum::Router {
    setup_test_app_with(api, 8)
}

/// Send a request and decode the JSON body. Empty bodies become `Null` and
/// plain-text extractor rejections a JSON string.
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
