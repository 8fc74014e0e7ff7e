//! Records produced by the Contact and Volunteer forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a form is incomplete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// A message sent from the Contact page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// All fields are required
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        check_email(&self.email)?;
        require("subject", &self.subject)?;
        require("message", &self.message)?;
        Ok(())
    }
}

/// An application sent from the Volunteer page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerApplication {
    pub full_name: String,
    pub email: String,
    pub hours_per_week: u32,
    pub phone: String,
    /// Date the volunteer becomes available
    pub period_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    pub message: String,
}

impl VolunteerApplication {
    /// Everything except nationality is required
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("full_name", &self.full_name)?;
        require("email", &self.email)?;
        check_email(&self.email)?;
        require("phone", &self.phone)?;
        require("message", &self.message)?;
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

// Same bar as an `<input type="email">`: something@something
fn check_email(email: &str) -> Result<(), ValidationError> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidEmail(email.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactSubmission {
        ContactSubmission {
            name: "Amina".to_string(),
            email: "amina@example.org".to_string(),
            subject: "Visiting".to_string(),
            message: "When is the open day?".to_string(),
        }
    }

    #[test]
    fn test_contact_valid() {
        assert!(contact().validate().is_ok());
    }

    #[test]
    fn test_contact_missing_subject() {
        let mut c = contact();
        c.subject = "  ".to_string();
        assert_eq!(c.validate(), Err(ValidationError::MissingField("subject")));
    }

    #[test]
    fn test_contact_bad_email() {
        let mut c = contact();
        c.email = "amina.example.org".to_string();
        assert!(matches!(c.validate(), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn test_volunteer_nationality_optional() {
        let app = VolunteerApplication {
            full_name: "Yusuf Ali".to_string(),
            email: "yusuf@example.org".to_string(),
            hours_per_week: 5,
            phone: "+44 20 7946 0000".to_string(),
            period_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            nationality: None,
            message: "Happy to help with events".to_string(),
        };
        assert!(app.validate().is_ok());

        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["period_date"], "2025-01-06");
        assert!(json.get("nationality").is_none());
    }
}
