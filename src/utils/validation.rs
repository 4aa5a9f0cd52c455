use crate::utils::error::{LabError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_count(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(LabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite positive number".to_string(),
        });
    }
    Ok(())
}

/// Open-interval check, used for correlations and probabilities that must
/// stay strictly inside their bounds.
pub fn validate_open_interval(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value <= min || value >= max {
        return Err(LabError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be strictly between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_strictly_increasing(field_name: &str, values: &[f64]) -> Result<()> {
    for pair in values.windows(2) {
        if pair[1] <= pair[0] {
            return Err(LabError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format!("{:?}", values),
                reason: "Values must be strictly increasing".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "./output").is_ok());
        assert!(validate_path("output.path", "").is_err());
    }

    #[test]
    fn test_validate_positive_count() {
        assert!(validate_positive_count("simulation.runs", 5, 1).is_ok());
        assert!(validate_positive_count("simulation.runs", 0, 1).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("smile.texp", 0.5).is_ok());
        assert!(validate_positive("smile.texp", 0.0).is_err());
        assert!(validate_positive("smile.texp", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_open_interval() {
        assert!(validate_open_interval("factor.rho", -0.4, -1.0, 1.0).is_ok());
        assert!(validate_open_interval("factor.rho", 1.0, -1.0, 1.0).is_err());
        assert!(validate_open_interval("factor.rho", -1.5, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_strictly_increasing() {
        assert!(validate_strictly_increasing("strikes", &[0.9, 1.0, 1.1]).is_ok());
        assert!(validate_strictly_increasing("strikes", &[0.9, 0.9, 1.1]).is_err());
        assert!(validate_strictly_increasing("strikes", &[1.1, 1.0]).is_err());
    }
}
