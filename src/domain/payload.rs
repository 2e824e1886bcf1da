use crate::domain::profile::WireField;
use serde::{Deserialize, Serialize};

/// The wire-schema representation of an incident.
///
/// Every field is optional on the wire: the active profile decides which ones
/// are emitted, and the validators decide which ones must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_urgent_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl CanonicalPayload {
    /// Text value of a wire field. Always `None` for the boolean flag.
    #[must_use]
    pub fn text(&self, field: WireField) -> Option<&str> {
        let value = match field {
            WireField::IncidentTitle => &self.incident_title,
            WireField::IncidentDescription => &self.incident_description,
            WireField::ReporterFullName => &self.reporter_full_name,
            WireField::ReporterEmailAddress => &self.reporter_email_address,
            WireField::ContactEmail => &self.contact_email,
            WireField::PriorityLevel => &self.priority_level,
            WireField::SeverityLevel => &self.severity_level,
            WireField::IncidentCategory => &self.incident_category,
            WireField::ContactPhone => &self.contact_phone,
            WireField::IncidentLocation => &self.incident_location,
            WireField::ReportTimestamp => &self.report_timestamp,
            WireField::ReportedDate => &self.reported_date,
            WireField::DeviceInformation => &self.device_information,
            WireField::OsVersion => &self.os_version,
            WireField::BrowserDetails => &self.browser_details,
            WireField::ApiVersion => &self.api_version,
            WireField::IsUrgentFlag => return None,
        };
        value.as_deref()
    }

    pub(crate) fn set_text(&mut self, field: WireField, value: String) {
        let slot = match field {
            WireField::IncidentTitle => &mut self.incident_title,
            WireField::IncidentDescription => &mut self.incident_description,
            WireField::ReporterFullName => &mut self.reporter_full_name,
            WireField::ReporterEmailAddress => &mut self.reporter_email_address,
            WireField::ContactEmail => &mut self.contact_email,
            WireField::PriorityLevel => &mut self.priority_level,
            WireField::SeverityLevel => &mut self.severity_level,
            WireField::IncidentCategory => &mut self.incident_category,
            WireField::ContactPhone => &mut self.contact_phone,
            WireField::IncidentLocation => &mut self.incident_location,
            WireField::ReportTimestamp => &mut self.report_timestamp,
            WireField::ReportedDate => &mut self.reported_date,
            WireField::DeviceInformation => &mut self.device_information,
            WireField::OsVersion => &mut self.os_version,
            WireField::BrowserDetails => &mut self.browser_details,
            WireField::ApiVersion => &mut self.api_version,
            WireField::IsUrgentFlag => return,
        };
        *slot = Some(value);
    }
}

/// Response body produced by the accepting side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub incident_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_fields: Option<CanonicalPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Acknowledgement {
    #[must_use]
    pub fn rejected(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            incident_id: String::new(),
            errors,
            received_fields: None,
            timestamp: None,
        }
    }
}
