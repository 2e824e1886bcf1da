use crate::domain::email::{EmailAddress, EmailPolicy};
use crate::domain::form::FormRecord;
use crate::domain::payload::CanonicalPayload;
use crate::domain::profile::{FieldLimits, MappingProfile, WireField};
use crate::domain::validation::ValidationOutcome;

/// Form-level and wire-level validation under one mapping profile.
///
/// The two passes use different rule sets and neither is a substitute for the
/// other: the form pass checks what a person typed, the payload pass checks
/// what actually goes on the wire.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    profile: MappingProfile,
    email_policy: EmailPolicy,
}

impl Validator {
    #[must_use]
    pub const fn new(profile: MappingProfile, email_policy: EmailPolicy) -> Self {
        Self { profile, email_policy }
    }

    #[must_use]
    pub const fn profile(&self) -> &MappingProfile {
        &self.profile
    }

    /// Checks a raw form record, collecting every violation.
    #[must_use]
    pub fn validate_form(&self, form: &FormRecord) -> ValidationOutcome {
        let mut errors = Vec::new();
        let limits = self.profile.limits;

        if self.profile.includes(WireField::IncidentTitle) {
            check_text(&mut errors, "Title", &form.title, limits.title);
        }
        if self.profile.includes(WireField::IncidentDescription) {
            check_text(&mut errors, "Description", &form.description, limits.description);
        }
        if self.profile.includes(WireField::ReporterFullName) {
            check_text(&mut errors, "Reporter name", &form.reporter_name, limits.reporter_name);
        }
        if self.profile.email_field().is_some() {
            if is_blank(&form.reporter_email) {
                errors.push("Email is required".to_string());
            } else if !EmailAddress::is_valid(&form.reporter_email, self.email_policy) {
                errors.push("Please enter a valid email address".to_string());
            }
        }
        if let Some(field) = self.profile.priority_field()
            && is_blank(&form.priority)
        {
            let label = if field == WireField::SeverityLevel { "Severity" } else { "Priority" };
            errors.push(format!("{label} must be selected"));
        }
        if self.profile.includes(WireField::IncidentCategory) && is_blank(&form.category) {
            errors.push("Category must be selected".to_string());
        }

        ValidationOutcome::from_errors(errors)
    }

    /// Checks a wire payload on its own terms: required wire fields present
    /// and the address field well-formed.
    #[must_use]
    pub fn validate_payload(&self, payload: &CanonicalPayload) -> ValidationOutcome {
        let mut errors: Vec<String> = self
            .profile
            .required_fields()
            .filter(|&field| payload.text(field).is_none_or(is_blank))
            .map(|field| format!("{} is required", field.wire_name()))
            .collect();

        if let Some(field) = self.profile.email_field()
            && let Some(address) = payload.text(field).filter(|a| !is_blank(a))
            && !EmailAddress::is_valid(address, self.email_policy)
        {
            errors.push(format!("{} must be a valid email address", field.wire_name()));
        }

        ValidationOutcome::from_errors(errors)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_text(errors: &mut Vec<String>, label: &str, value: &str, limits: FieldLimits) {
    if is_blank(value) {
        errors.push(format!("{label} is required"));
        return;
    }
    let len = value.chars().count();
    if len > limits.max {
        errors.push(format!("{label} cannot exceed {} characters", limits.max));
    } else if len < limits.min {
        errors.push(format!("{label} must be at least {} characters", limits.min));
    }
}
