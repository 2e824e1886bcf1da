/// Result of one validation pass: valid exactly when no errors were collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    errors: Vec<String>,
}

impl ValidationOutcome {
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self { errors }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Errors joined for display, in the order they were found.
    #[must_use]
    pub fn joined(&self) -> String {
        self.errors.join(", ")
    }
}
