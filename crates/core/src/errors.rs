use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid value `{value}` for setting `{key}`")]
    InvalidSetting { key: String, value: String },
    #[error("clearance pricing is disabled; enable it before editing clearance prices")]
    ClearanceDisabled,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class used in operator output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::InvalidSetting { .. }) => "invalid_setting",
            Self::Domain(DomainError::ClearanceDisabled) => "clearance_disabled",
            Self::Persistence(_) => "persistence",
            Self::Configuration(_) => "config_validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_errors_keep_their_class_when_wrapped() {
        let error = ApplicationError::from(DomainError::InvalidSetting {
            key: "clearance_from_date".to_owned(),
            value: "tomorrow".to_owned(),
        });

        assert_eq!(error.error_class(), "invalid_setting");
        assert_eq!(
            error.to_string(),
            "invalid value `tomorrow` for setting `clearance_from_date`"
        );
    }

    #[test]
    fn persistence_error_has_its_own_class() {
        let error = ApplicationError::Persistence("database is locked".to_owned());

        assert_eq!(error.error_class(), "persistence");
        assert_eq!(error.to_string(), "persistence failure: database is locked");
    }

    #[test]
    fn disabled_clearance_is_reported_to_the_operator() {
        let error = ApplicationError::from(DomainError::ClearanceDisabled);

        assert_eq!(error.error_class(), "clearance_disabled");
        assert!(error.to_string().contains("disabled"));
    }
}
