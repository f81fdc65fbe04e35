// --- File: crates/consultify_booking/src/forms.rs ---
//! Contact-step form handling.
//!
//! Validation happens entirely on this side of the remote boundary: a form
//! that fails here never produces a network call. Messages are written for
//! the person filling in the form, not for logs.

use serde::{Deserialize, Serialize};

use consultify_common::services::{CommunicationMethod, LeadDetails, LeadSelector};

/// One field that failed validation, with the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// The contact step as submitted by the presentation layer.
///
/// Either `lead_id` references a lead the CRM already knows, or the
/// name/email pair describes a new one the backend creates together with
/// the booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContactForm {
    #[serde(default)]
    pub lead_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub communication_method: CommunicationMethod,
}

/// A validated contact step, ready to become a booking request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedContact {
    pub lead: LeadSelector,
    pub communication_method: CommunicationMethod,
    pub notes: Option<String>,
}

impl ContactForm {
    /// Validates the form and packages it for the booking request.
    ///
    /// The existing-lead path skips the name/email checks entirely; the
    /// CRM record is the authority on those.
    pub fn validate(&self) -> Result<ValidatedContact, Vec<FieldError>> {
        if let Some(lead_id) = self.lead_id {
            return Ok(ValidatedContact {
                lead: LeadSelector::Existing { lead_id },
                communication_method: self.communication_method,
                notes: normalize(&self.notes),
            });
        }

        let mut errors = Vec::new();

        let name = self.name.as_deref().unwrap_or("").trim().to_string();
        if name.chars().count() < 2 {
            errors.push(FieldError::new(
                "name",
                "Name must be at least 2 characters.",
            ));
        }

        let email = self.email.as_deref().unwrap_or("").trim().to_string();
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Enter a valid email address."));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedContact {
            lead: LeadSelector::New {
                lead: LeadDetails {
                    name,
                    email,
                    phone: normalize(&self.phone),
                    company: normalize(&self.company),
                },
            },
            communication_method: self.communication_method,
            notes: normalize(&self.notes),
        })
    }
}

/// Structural email check: one `@`, a non-empty local part, a dot inside
/// the domain, no whitespace. Deliverability is checked upstream.
pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn normalize(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
