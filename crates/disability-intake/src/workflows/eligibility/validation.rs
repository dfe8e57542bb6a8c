use once_cell::sync::Lazy;
use regex::Regex;

use super::domain::Lead;

/// Validation errors raised by the lead guard, reported in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadViolation {
    #[error("first name is required")]
    MissingFirstName,
    #[error("last name is required")]
    MissingLastName,
    #[error("email address is not well formed")]
    InvalidEmail,
    #[error("phone number must have at least {min} characters (found {found})")]
    PhoneTooShort { min: usize, found: usize },
    #[error("preferred contact time is required")]
    MissingBestTime,
    #[error("consent to be contacted is required")]
    ConsentRequired,
}

const DEFAULT_MIN_PHONE_LENGTH: usize = 7;

/// Policy dial backing lead validation.
#[derive(Debug, Clone)]
pub struct LeadPolicy {
    min_phone_length: usize,
}

impl LeadPolicy {
    pub fn new(min_phone_length: usize) -> Self {
        let sanitized = if min_phone_length == 0 {
            DEFAULT_MIN_PHONE_LENGTH
        } else {
            min_phone_length
        };

        Self {
            min_phone_length: sanitized,
        }
    }

    pub fn min_phone_length(&self) -> usize {
        self.min_phone_length
    }
}

impl Default for LeadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PHONE_LENGTH)
    }
}

/// Guard deciding whether a lead may be submitted.
#[derive(Debug, Clone, Default)]
pub struct LeadGuard {
    policy: LeadPolicy,
}

impl LeadGuard {
    pub fn with_policy(policy: LeadPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LeadPolicy {
        &self.policy
    }

    pub fn validate(&self, lead: &Lead) -> Result<(), LeadViolation> {
        if lead.first_name.trim().is_empty() {
            return Err(LeadViolation::MissingFirstName);
        }

        if lead.last_name.trim().is_empty() {
            return Err(LeadViolation::MissingLastName);
        }

        if !is_well_formed_email(&lead.email) {
            return Err(LeadViolation::InvalidEmail);
        }

        let phone_length = lead.phone.trim().chars().count();
        if phone_length < self.policy.min_phone_length {
            return Err(LeadViolation::PhoneTooShort {
                min: self.policy.min_phone_length,
                found: phone_length,
            });
        }

        if lead.best_time.trim().is_empty() {
            return Err(LeadViolation::MissingBestTime);
        }

        if !lead.consent {
            return Err(LeadViolation::ConsentRequired);
        }

        Ok(())
    }

    pub fn is_valid(&self, lead: &Lead) -> bool {
        self.validate(lead).is_ok()
    }
}

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+.\-]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Email shape accepted by the lead form.
///
/// The local part uses `[A-Za-z0-9_'+.-]`, never starts with or doubles a dot, and ends on a
/// non-dot. Domain labels start alphanumeric and the top-level label is at least two letters.
pub fn is_well_formed_email(raw: &str) -> bool {
    let email = raw.trim();
    if email.starts_with('.') {
        return false;
    }

    let local = email.split('@').next().unwrap_or_default();
    if local.contains("..") {
        return false;
    }

    EMAIL_PATTERN.is_match(email)
}
