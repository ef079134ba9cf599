//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("database.path is required")]
    MissingDatabasePath,
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
    #[error("logging.filter is not a valid filter: {0}")]
    InvalidLogFilter(String),
    #[error("carriers[{0}].name is required")]
    MissingCarrierName(usize),
    #[error("carriers[{0}].email_domain is required")]
    MissingCarrierDomain(usize),
    #[error("carrier listed twice: {0}")]
    DuplicateCarrier(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Database path validation
    let db_path = &config.database.path;
    if db_path.is_empty() {
        errors.push(ValidationError::MissingDatabasePath);
    } else if db_path != ":memory:" {
        let path = Path::new(db_path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ValidationError::DatabasePathInvalid(db_path.clone()));
        }
    }

    if EnvFilter::try_new(&config.logging.filter).is_err() {
        errors.push(ValidationError::InvalidLogFilter(config.logging.filter.clone()));
    }

    // Carrier seeds
    let mut seen = HashSet::new();
    for (i, carrier) in config.carriers.iter().enumerate() {
        if carrier.name.is_empty() {
            errors.push(ValidationError::MissingCarrierName(i));
        } else if !seen.insert(carrier.name.as_str()) {
            errors.push(ValidationError::DuplicateCarrier(carrier.name.clone()));
        }
        if carrier.email_domain.is_empty() {
            errors.push(ValidationError::MissingCarrierDomain(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
