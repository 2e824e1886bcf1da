use time::OffsetDateTime;

/// Incident categories offered by the capture form.
pub const CATEGORIES: [&str; 8] =
    ["General", "Technical", "Security", "Performance", "User Interface", "Data Issue", "Network", "Hardware"];

/// Human-facing priority selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Case-insensitive lookup of a selector token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label().eq_ignore_ascii_case(token))
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// An incident report as captured by the form, before any transformation.
///
/// Selector fields (`priority`, `category`) hold the raw token the form
/// produced; unrecognized tokens are resolved during mapping, not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    pub title: String,
    pub description: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub priority: String,
    pub category: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub is_urgent: bool,
    /// Local time at capture, carrying its UTC offset.
    pub reported_at: OffsetDateTime,
    pub device_info: Option<String>,
    pub operating_system: Option<String>,
    pub browser_version: Option<String>,
}

impl FormRecord {
    /// Creates a record with the form's default selectors (`Medium`, `General`).
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        reporter_name: impl Into<String>,
        reporter_email: impl Into<String>,
        reported_at: OffsetDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            reporter_name: reporter_name.into(),
            reporter_email: reporter_email.into(),
            priority: Priority::Medium.label().to_string(),
            category: CATEGORIES[0].to_string(),
            phone: None,
            location: None,
            is_urgent: false,
            reported_at,
            device_info: None,
            operating_system: None,
            browser_version: None,
        }
    }
}
