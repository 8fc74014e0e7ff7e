//! Contact and Volunteer form submission.
//!
//! A form goes Idle -> Submitting -> Success | Error. Both outcomes are
//! transient and fall back to Idle after the form's fixed delay.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::{RecordSource, SourceError, Table};
use crate::domain::{ContactSubmission, ValidationError, VolunteerApplication};

pub const CONTACT_ACK: Duration = Duration::from_secs(5);
pub const VOLUNTEER_ACK: Duration = Duration::from_secs(4);

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Invalid submission: {0}")]
    Invalid(#[from] ValidationError),

    #[error("A submission is already in flight")]
    InFlight,

    #[error("Failed to store submission: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A record one of the site's forms can submit
pub trait Submission: Serialize {
    const TABLE: Table;

    fn validate(&self) -> Result<(), ValidationError>;
}

impl Submission for ContactSubmission {
    const TABLE: Table = Table::ContactSubmissions;

    fn validate(&self) -> Result<(), ValidationError> {
        ContactSubmission::validate(self)
    }
}

impl Submission for VolunteerApplication {
    const TABLE: Table = Table::VolunteerSubmissions;

    fn validate(&self) -> Result<(), ValidationError> {
        VolunteerApplication::validate(self)
    }
}

/// Validate and insert a single record
pub async fn submit<S: Submission>(source: &dyn RecordSource, record: &S) -> Result<(), SubmissionError> {
    record.validate()?;
    let value = serde_json::to_value(record)?;
    source.insert(S::TABLE, value).await?;
    info!("Stored submission in {}", S::TABLE);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

/// Status tracker for one form
#[derive(Debug, Clone)]
pub struct FormState {
    ack: Duration,
    status: SubmissionStatus,
    /// When the current Success or Error was reached
    settled_at: Option<Instant>,
}

impl FormState {
    pub fn new(ack: Duration) -> Self {
        Self {
            ack,
            status: SubmissionStatus::Idle,
            settled_at: None,
        }
    }

    pub fn contact() -> Self {
        Self::new(CONTACT_ACK)
    }

    pub fn volunteer() -> Self {
        Self::new(VOLUNTEER_ACK)
    }

    /// Status as seen at `now`; an outcome older than the ack delay reads as Idle
    pub fn status_at(&self, now: Instant) -> SubmissionStatus {
        match (self.status, self.settled_at) {
            (SubmissionStatus::Success | SubmissionStatus::Error, Some(at))
                if now.saturating_duration_since(at) >= self.ack =>
            {
                SubmissionStatus::Idle
            }
            (status, _) => status,
        }
    }

    fn settle(&mut self, status: SubmissionStatus) {
        self.status = status;
        self.settled_at = Some(Instant::now());
    }

    /// Run one submission through the form, updating status around it
    pub async fn submit<S: Submission>(
        &mut self,
        source: &dyn RecordSource,
        record: &S,
    ) -> Result<(), SubmissionError> {
        if self.status == SubmissionStatus::Submitting {
            return Err(SubmissionError::InFlight);
        }

        self.status = SubmissionStatus::Submitting;
        self.settled_at = None;

        match submit(source, record).await {
            Ok(()) => {
                self.settle(SubmissionStatus::Success);
                Ok(())
            }
            Err(e) => {
                warn!("Submission to {} failed: {}", S::TABLE, e);
                self.settle(SubmissionStatus::Error);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixtureSource, PageQuery};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::Value;

    /// Answers every insert with a 500
    struct RejectingSource;

    #[async_trait]
    impl RecordSource for RejectingSource {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn fetch_page(&self, _query: &PageQuery) -> Result<Vec<Value>, SourceError> {
            Ok(Vec::new())
        }

        async fn insert(&self, _table: Table, _record: Value) -> Result<(), SourceError> {
            Err(SourceError::Status {
                status: 500,
                body: "internal error".to_string(),
            })
        }
    }

    fn contact() -> ContactSubmission {
        ContactSubmission {
            name: "Yusuf".to_string(),
            email: "yusuf@example.org".to_string(),
            subject: "Visiting the centre".to_string(),
            message: "What time is the open day?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_contact_submission_is_stored() {
        let source = FixtureSource::new();
        let mut form = FormState::contact();

        form.submit(&source, &contact()).await.unwrap();

        let now = Instant::now();
        assert_eq!(form.status_at(now), SubmissionStatus::Success);
        assert_eq!(form.status_at(now + CONTACT_ACK), SubmissionStatus::Idle);

        let stored = source.records(Table::ContactSubmissions).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["subject"], "Visiting the centre");
    }

    #[tokio::test]
    async fn test_invalid_submission_is_not_stored() {
        let source = FixtureSource::new();
        let mut form = FormState::contact();
        let mut record = contact();
        record.message = "  ".to_string();

        let err = form.submit(&source, &record).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Invalid(ValidationError::MissingField("message"))));
        let now = Instant::now();
        assert_eq!(form.status_at(now), SubmissionStatus::Error);
        assert_eq!(form.status_at(now + CONTACT_ACK), SubmissionStatus::Idle);
        assert!(source.records(Table::ContactSubmissions).await.is_empty());
    }

    #[tokio::test]
    async fn test_volunteer_ack_is_shorter() {
        let source = FixtureSource::new();
        let mut form = FormState::volunteer();
        let application = VolunteerApplication {
            full_name: "Maryam Ali".to_string(),
            email: "maryam@example.org".to_string(),
            hours_per_week: 6,
            phone: "+44 7700 900123".to_string(),
            period_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            nationality: None,
            message: "Happy to help with events.".to_string(),
        };

        form.submit(&source, &application).await.unwrap();

        let now = Instant::now();
        assert_eq!(form.status_at(now + Duration::from_secs(3)), SubmissionStatus::Success);
        assert_eq!(form.status_at(now + VOLUNTEER_ACK), SubmissionStatus::Idle);

        let stored = source.records(Table::VolunteerSubmissions).await;
        assert_eq!(stored[0]["period_date"], "2026-11-01");
        assert!(stored[0].get("nationality").is_none());
    }

    #[tokio::test]
    async fn test_storage_error_clears_after_delay() {
        let source = RejectingSource;
        let mut form = FormState::volunteer();
        let application = VolunteerApplication {
            full_name: "Idris Khan".to_string(),
            email: "idris@example.org".to_string(),
            hours_per_week: 2,
            phone: "0123".to_string(),
            period_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            nationality: Some("UK".to_string()),
            message: "Weekends only.".to_string(),
        };

        let err = form.submit(&source, &application).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Source(_)));

        let now = Instant::now();
        assert_eq!(form.status_at(now + Duration::from_secs(3)), SubmissionStatus::Error);
        assert_eq!(form.status_at(now + Duration::from_secs(60)), SubmissionStatus::Idle);
    }
}
