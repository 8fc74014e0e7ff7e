//! Contact and Volunteer form commands.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::adapters::RecordSource;
use crate::config;
use crate::domain::{ContactSubmission, VolunteerApplication};
use crate::forms::{FormState, Submission, SubmissionStatus};

pub async fn send_contact(source: Arc<dyn RecordSource>, record: ContactSubmission) -> Result<()> {
    let mut form = FormState::new(config::config()?.forms.contact_ack);
    send(&mut form, source.as_ref(), &record, "Message sent. We'll get back to you soon.").await
}

pub async fn send_volunteer(source: Arc<dyn RecordSource>, record: VolunteerApplication) -> Result<()> {
    let mut form = FormState::new(config::config()?.forms.volunteer_ack);
    send(&mut form, source.as_ref(), &record, "Application received. Thank you for volunteering!").await
}

async fn send<S: Submission>(
    form: &mut FormState,
    source: &dyn RecordSource,
    record: &S,
    acknowledgement: &str,
) -> Result<()> {
    form.submit(source, record)
        .await
        .with_context(|| format!("Failed to submit to {}", S::TABLE))?;

    if form.status_at(Instant::now()) == SubmissionStatus::Success {
        println!("✓ {}", acknowledgement);
    }
    Ok(())
}
