use clap::ValueEnum;

/// A field of the wire schema, named by its snake_case key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireField {
    IncidentTitle,
    IncidentDescription,
    ReporterFullName,
    ReporterEmailAddress,
    ContactEmail,
    PriorityLevel,
    SeverityLevel,
    IncidentCategory,
    ContactPhone,
    IncidentLocation,
    ReportTimestamp,
    ReportedDate,
    IsUrgentFlag,
    DeviceInformation,
    OsVersion,
    BrowserDetails,
    ApiVersion,
}

impl WireField {
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::IncidentTitle => "incident_title",
            Self::IncidentDescription => "incident_description",
            Self::ReporterFullName => "reporter_full_name",
            Self::ReporterEmailAddress => "reporter_email_address",
            Self::ContactEmail => "contact_email",
            Self::PriorityLevel => "priority_level",
            Self::SeverityLevel => "severity_level",
            Self::IncidentCategory => "incident_category",
            Self::ContactPhone => "contact_phone",
            Self::IncidentLocation => "incident_location",
            Self::ReportTimestamp => "report_timestamp",
            Self::ReportedDate => "reported_date",
            Self::IsUrgentFlag => "is_urgent_flag",
            Self::DeviceInformation => "device_information",
            Self::OsVersion => "os_version",
            Self::BrowserDetails => "browser_details",
            Self::ApiVersion => "api_version",
        }
    }

    /// Whether the receiving side rejects a payload missing this field.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(
            self,
            Self::IncidentTitle
                | Self::IncidentDescription
                | Self::ReporterFullName
                | Self::ReporterEmailAddress
                | Self::ContactEmail
                | Self::PriorityLevel
                | Self::SeverityLevel
                | Self::IncidentCategory
        )
    }

    #[must_use]
    pub const fn is_email(self) -> bool {
        matches!(self, Self::ReporterEmailAddress | Self::ContactEmail)
    }

    #[must_use]
    pub const fn is_timestamp(self) -> bool {
        matches!(self, Self::ReportTimestamp | Self::ReportedDate)
    }
}

/// Coding table applied to the priority selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityCoding {
    /// `P1` (critical) through `P4` (low).
    Numbered,
    /// `priority_low` .. `priority_critical`.
    Named,
    /// `sev_low` .. `sev_critical`.
    Severity,
}

/// Coding applied to the category selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryCoding {
    /// Lowercase with spaces replaced by underscores.
    Slug,
    /// Lookup in the fixed category table.
    Table,
}

/// Inclusive character-count bounds for a free-text form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub min: usize,
    pub max: usize,
}

impl FieldLimits {
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLimits {
    pub title: FieldLimits,
    pub description: FieldLimits,
    pub reporter_name: FieldLimits,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            title: FieldLimits::new(1, 100),
            description: FieldLimits::new(1, 500),
            reporter_name: FieldLimits::new(1, 50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProfileKind {
    #[default]
    Full,
    Contact,
    Minimal,
}

/// Field set and coding tables for one flavour of the wire schema.
///
/// All flavours share the same mapping shape (rename plus value recode); they
/// differ only in which wire fields they emit and which tables they code with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingProfile {
    pub kind: ProfileKind,
    pub fields: Vec<WireField>,
    pub priority_coding: PriorityCoding,
    pub category_coding: CategoryCoding,
    pub limits: FormLimits,
    pub api_version: Option<String>,
}

impl MappingProfile {
    /// The 13-field schema with device descriptors and numbered priorities.
    #[must_use]
    pub fn full() -> Self {
        Self {
            kind: ProfileKind::Full,
            fields: vec![
                WireField::IncidentTitle,
                WireField::IncidentDescription,
                WireField::PriorityLevel,
                WireField::IncidentCategory,
                WireField::ReporterEmailAddress,
                WireField::ReporterFullName,
                WireField::ContactPhone,
                WireField::IncidentLocation,
                WireField::ReportTimestamp,
                WireField::IsUrgentFlag,
                WireField::DeviceInformation,
                WireField::OsVersion,
                WireField::BrowserDetails,
                WireField::ApiVersion,
            ],
            priority_coding: PriorityCoding::Numbered,
            category_coding: CategoryCoding::Slug,
            limits: FormLimits::default(),
            api_version: Some("1.0".to_string()),
        }
    }

    /// The contact-email schema without device descriptors.
    #[must_use]
    pub fn contact() -> Self {
        Self {
            kind: ProfileKind::Contact,
            fields: vec![
                WireField::IncidentTitle,
                WireField::IncidentDescription,
                WireField::ReporterFullName,
                WireField::ContactEmail,
                WireField::PriorityLevel,
                WireField::IncidentCategory,
                WireField::ReportedDate,
                WireField::IncidentLocation,
                WireField::IsUrgentFlag,
            ],
            priority_coding: PriorityCoding::Named,
            category_coding: CategoryCoding::Table,
            limits: FormLimits::default(),
            api_version: None,
        }
    }

    /// Title and severity only.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            kind: ProfileKind::Minimal,
            fields: vec![WireField::IncidentTitle, WireField::SeverityLevel],
            priority_coding: PriorityCoding::Severity,
            category_coding: CategoryCoding::Slug,
            limits: FormLimits::default(),
            api_version: None,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: FormLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn includes(&self, field: WireField) -> bool {
        self.fields.contains(&field)
    }

    /// The wire field carrying the reporter's address, if this profile has one.
    #[must_use]
    pub fn email_field(&self) -> Option<WireField> {
        self.fields.iter().copied().find(|f| f.is_email())
    }

    /// The wire field carrying the coded priority, if this profile has one.
    #[must_use]
    pub fn priority_field(&self) -> Option<WireField> {
        self.fields.iter().copied().find(|f| matches!(f, WireField::PriorityLevel | WireField::SeverityLevel))
    }

    /// The wire field carrying the report time, if this profile has one.
    #[must_use]
    pub fn timestamp_field(&self) -> Option<WireField> {
        self.fields.iter().copied().find(|f| f.is_timestamp())
    }

    pub fn required_fields(&self) -> impl Iterator<Item = WireField> + '_ {
        self.fields.iter().copied().filter(|f| f.is_required())
    }
}

impl Default for MappingProfile {
    fn default() -> Self {
        Self::full()
    }
}

impl From<ProfileKind> for MappingProfile {
    fn from(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Full => Self::full(),
            ProfileKind::Contact => Self::contact(),
            ProfileKind::Minimal => Self::minimal(),
        }
    }
}
