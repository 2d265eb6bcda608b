//! Settings validation.

use crate::schema::{normalize_domain, HostConfig, Settings};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Settings validator.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate user settings.
    pub fn validate(settings: &Settings) -> ValidationResult {
        let mut result = ValidationResult::default();
        Self::validate_thresholds(settings, &mut result);
        Self::validate_excluded_domains(settings, &mut result);
        result
    }

    /// Validate the host configuration, including its default settings.
    pub fn validate_host(config: &HostConfig) -> ValidationResult {
        let mut result = Self::validate(&config.settings);

        if config.queue.open_delay_ms > 5_000 {
            result.add_warning(ValidationWarning::new(
                "queue.open_delay_ms",
                "open_delay_ms is very high (>5s), queued tabs will open slowly",
            ));
        }

        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        }

        result
    }

    fn validate_thresholds(settings: &Settings, result: &mut ValidationResult) {
        if settings.debounce_ms == 0 {
            result.add_error(ValidationError::new(
                "debounceMs",
                "debounceMs must be greater than 0",
            ));
        }

        if settings.click_distance_px == 0 {
            result.add_error(ValidationError::new(
                "clickDistancePx",
                "clickDistancePx must be greater than 0",
            ));
        }

        if settings.click_time_ms == 0 {
            result.add_error(ValidationError::new(
                "clickTimeMs",
                "clickTimeMs must be greater than 0",
            ));
        }

        if settings.debounce_ms > 10_000 {
            result.add_warning(ValidationWarning::new(
                "debounceMs",
                "debounceMs is very high (>10s), repeated opens will be dropped",
            ));
        }
    }

    fn validate_excluded_domains(settings: &Settings, result: &mut ValidationResult) {
        for domain in &settings.excluded_domains {
            let normalized = normalize_domain(domain);
            if normalized.is_empty() {
                result.add_error(ValidationError::new(
                    "excludedDomains",
                    format!("Excluded domain '{}' is empty after normalization", domain),
                ));
            } else if normalized != *domain {
                result.add_warning(ValidationWarning::new(
                    "excludedDomains",
                    format!("Excluded domain '{}' will be matched as '{}'", domain, normalized),
                ));
            }

            if normalized.contains('/') || normalized.contains(':') {
                result.add_warning(ValidationWarning::new(
                    "excludedDomains",
                    format!("Excluded domain '{}' looks like a URL, not a hostname", domain),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
