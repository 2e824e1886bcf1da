use crate::domain::form::FormRecord;
use crate::domain::payload::CanonicalPayload;
use crate::domain::profile::{MappingProfile, WireField};
use crate::services::codec;

/// Builds wire payloads from form records under one mapping profile.
#[derive(Clone, Debug, Default)]
pub struct SchemaMapper {
    profile: MappingProfile,
}

impl SchemaMapper {
    #[must_use]
    pub const fn new(profile: MappingProfile) -> Self {
        Self { profile }
    }

    #[must_use]
    pub const fn profile(&self) -> &MappingProfile {
        &self.profile
    }

    /// Renames and recodes every field the profile emits. Pure: the same
    /// record always yields the same payload.
    #[must_use]
    pub fn to_canonical(&self, form: &FormRecord) -> CanonicalPayload {
        let mut payload = CanonicalPayload::default();
        for &field in &self.profile.fields {
            if field == WireField::IsUrgentFlag {
                payload.is_urgent_flag = Some(form.is_urgent);
            } else if let Some(value) = self.wire_value(field, form) {
                payload.set_text(field, value);
            }
        }
        payload
    }

    fn wire_value(&self, field: WireField, form: &FormRecord) -> Option<String> {
        let optional = |value: &Option<String>| Some(value.clone().unwrap_or_default());
        match field {
            WireField::IncidentTitle => Some(form.title.clone()),
            WireField::IncidentDescription => Some(form.description.clone()),
            WireField::ReporterFullName => Some(form.reporter_name.clone()),
            WireField::ReporterEmailAddress | WireField::ContactEmail => Some(form.reporter_email.clone()),
            WireField::PriorityLevel | WireField::SeverityLevel => {
                Some(codec::map_priority(&form.priority, self.profile.priority_coding).to_string())
            }
            WireField::IncidentCategory => Some(codec::map_category(&form.category, self.profile.category_coding)),
            WireField::ContactPhone => Some(form.phone.as_deref().map(codec::format_phone).unwrap_or_default()),
            WireField::IncidentLocation => optional(&form.location),
            WireField::ReportTimestamp | WireField::ReportedDate => Some(codec::format_timestamp(form.reported_at)),
            WireField::DeviceInformation => optional(&form.device_info),
            WireField::OsVersion => optional(&form.operating_system),
            WireField::BrowserDetails => optional(&form.browser_version),
            WireField::ApiVersion => self.profile.api_version.clone(),
            WireField::IsUrgentFlag => None,
        }
    }
}
