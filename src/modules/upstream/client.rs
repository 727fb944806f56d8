use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use rollbook_config::UpstreamConfig;
use rollbook_models::{AcademicSessionTerms, ClassId, RosterEntry};
use serde::de::DeserializeOwned;
use tracing::{Instrument, info_span};
use validator::Validate;

use super::{RosterSource, SubmissionAdapter, UpstreamError};
use crate::modules::wizard::model::AttendanceSubmission;

const MAX_ERROR_BODY: usize = 200;

/// JSON client for the school API.
///
/// - `GET {base}/classes/{id}/students`
/// - `GET {base}/academic-sessions/terms`
/// - `POST {base}/attendance`
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut message = response.text().await.unwrap_or_default();
        if message.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| message.is_char_boundary(*i))
                .unwrap_or(0);
            message.truncate(cut);
        }

        Err(UpstreamError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let span = info_span!(
            "http.client",
            service.name = "school-api",
            http.method = "GET",
            http.url = %path,
            otel.kind = "client"
        );

        async {
            let response = self.request(Method::GET, path).send().await?;
            Ok::<T, UpstreamError>(Self::check(response).await?.json::<T>().await?)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl RosterSource for UpstreamClient {
    async fn fetch_roster(&self, class_id: ClassId) -> Result<Vec<RosterEntry>, UpstreamError> {
        let roster: Vec<RosterEntry> = self
            .get_json(&format!("/classes/{}/students", class_id))
            .await?;
        tracing::debug!(%class_id, students = roster.len(), "Fetched class roster");
        Ok(roster)
    }

    async fn fetch_sessions_and_terms(&self) -> Result<AcademicSessionTerms, UpstreamError> {
        let terms: AcademicSessionTerms = self.get_json("/academic-sessions/terms").await?;
        terms
            .validate()
            .map_err(|e| UpstreamError::InvalidCalendar(e.to_string()))?;
        Ok(terms)
    }
}

#[async_trait]
impl SubmissionAdapter for UpstreamClient {
    async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<(), UpstreamError> {
        let span = info_span!(
            "http.client",
            service.name = "school-api",
            http.method = "POST",
            http.url = "/attendance",
            otel.kind = "client",
            class_id = %submission.class_id,
            school_days = submission.range.valid_days().len()
        );

        async {
            let response = self
                .request(Method::POST, "/attendance")
                .json(submission)
                .send()
                .await?;
            Self::check(response).await?;
            Ok::<(), UpstreamError>(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn client(token: Option<&str>) -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig {
            base_url: "https://school.example/api".to_string(),
            api_token: token.map(str::to_string),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_request_joins_base_url_and_adds_token() {
        let request = client(Some("secret"))
            .request(Method::GET, "/academic-sessions/terms")
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://school.example/api/academic-sessions/terms"
        );
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer secret");

        let anonymous = client(None)
            .request(Method::POST, "/attendance")
            .build()
            .unwrap();
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_rejection_body_is_truncated_on_char_boundary() {
        let response = axum::http::Response::builder()
            .status(422)
            .body("é".repeat(150))
            .unwrap();

        match UpstreamClient::check(Response::from(response)).await {
            Err(UpstreamError::Rejected { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message.chars().count(), 100);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}
