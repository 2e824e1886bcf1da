use std::fmt;
use std::str::FromStr;

const MAX_LOCAL_LEN: usize = 64;
const MAX_ADDRESS_LEN: usize = 254;

/// How strictly an address string is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailPolicy {
    /// The string must parse and render back to exactly itself.
    #[default]
    RoundTrip,
    /// Round-trip plus length limits and a dotted domain with an alphabetic TLD.
    Strict,
}

/// Strong type for a mailbox address (`local@domain`).
///
/// Parsing is lenient in the way mail headers are: surrounding whitespace and
/// a `Display Name <addr>` wrapper are accepted and discarded. Rendering only
/// emits the bare address, so comparing the rendered form with the input
/// detects both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    local: String,
    domain: String,
}

impl EmailAddress {
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.local
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Checks `input` under the given policy.
    #[must_use]
    pub fn is_valid(input: &str, policy: EmailPolicy) -> bool {
        let Ok(address) = input.parse::<Self>() else {
            return false;
        };
        if address.to_string() != input {
            return false;
        }
        match policy {
            EmailPolicy::RoundTrip => true,
            EmailPolicy::Strict => address.is_strict(),
        }
    }

    fn is_strict(&self) -> bool {
        if self.local.len() > MAX_LOCAL_LEN || self.local.len() + 1 + self.domain.len() > MAX_ADDRESS_LEN {
            return false;
        }
        self.domain
            .rsplit_once('.')
            .is_some_and(|(_, tld)| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
    }
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c)
}

fn check_local(local: &str) -> Result<(), String> {
    if local.is_empty() {
        return Err("Missing local part".into());
    }
    if local.split('.').any(str::is_empty) {
        return Err("Local part has an empty dot-separated segment".into());
    }
    if let Some(c) = local.chars().find(|&c| c != '.' && !is_atext(c)) {
        return Err(format!("Invalid character {c:?} in local part"));
    }
    Ok(())
}

fn check_domain(domain: &str) -> Result<(), String> {
    if domain.is_empty() {
        return Err("Missing domain".into());
    }
    for label in domain.split('.') {
        if label.is_empty() {
            return Err("Domain has an empty label".into());
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("Domain label {label:?} starts or ends with a hyphen"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(format!("Invalid domain label {label:?}"));
        }
    }
    Ok(())
}

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let address = match trimmed.rfind('<') {
            Some(open) if trimmed.ends_with('>') => trimmed[open + 1..trimmed.len() - 1].trim(),
            _ => trimmed,
        };

        let (local, domain) = address.rsplit_once('@').ok_or_else(|| "Missing '@'".to_string())?;
        check_local(local)?;
        check_domain(domain)?;

        Ok(Self { local: local.to_string(), domain: domain.to_string() })
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}
