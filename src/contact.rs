use crate::validation::{validate_contact_form, ContactFormErrors};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{info, warn};

/// Raw field values as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A validated, trimmed form ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Sent,
    Invalid(ContactFormErrors),
    Failed { reason: String },
}

/// Where submissions go once they pass validation.
pub trait ContactSink {
    fn deliver(&self, submission: &ContactSubmission) -> Result<()>;
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Validate, then hand the trimmed values to `sink`. The form itself is
    /// never cleared here, so a failed delivery keeps everything the visitor typed.
    pub fn submit(&self, sink: &dyn ContactSink) -> ContactOutcome {
        let validation = validate_contact_form(&self.name, &self.email, &self.message);
        if !validation.is_valid {
            return ContactOutcome::Invalid(validation.errors);
        }

        let submission = ContactSubmission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            submitted_at: Utc::now(),
        };

        match sink.deliver(&submission) {
            Ok(()) => {
                info!("Contact message from {} delivered", submission.email);
                ContactOutcome::Sent
            }
            Err(e) => {
                warn!("Contact delivery failed: {:#}", e);
                ContactOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Stand-in for the site's form backend: records deliveries and fails on request.
#[derive(Debug, Default)]
pub struct SimulatedSink {
    fail: bool,
    delivered: Mutex<Vec<ContactSubmission>>,
}

impl SimulatedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn delivered(&self) -> Vec<ContactSubmission> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ContactSink for SimulatedSink {
    fn deliver(&self, submission: &ContactSubmission) -> Result<()> {
        if self.fail {
            bail!("Failed to send message. Please try again.");
        }
        match self.delivered.lock() {
            Ok(mut delivered) => delivered.push(submission.clone()),
            Err(poisoned) => poisoned.into_inner().push(submission.clone()),
        }
        Ok(())
    }
}
