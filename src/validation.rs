use crate::demand::Demand;
use crate::resource::Resource;
use std::collections::HashSet;
use std::fmt;

/// Rejection of a resource or demand record at ingestion, before any
/// eligibility computation. The message identifies the offending record.
#[derive(Debug, Clone)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_resource(resource: &Resource) -> Result<(), ValidationError> {
    if resource.id.trim().is_empty() {
        return Err(ValidationError::new("resource has empty id"));
    }
    if resource.platform.trim().is_empty() {
        return Err(ValidationError::new(format!(
            "resource {} has empty platform",
            resource.id
        )));
    }
    if resource.locality.trim().is_empty() {
        return Err(ValidationError::new(format!(
            "resource {} has empty locality",
            resource.id
        )));
    }
    if resource.skills.is_empty() {
        return Err(ValidationError::new(format!(
            "resource {} has no skills",
            resource.id
        )));
    }
    if resource.states.is_empty() {
        return Err(ValidationError::new(format!(
            "resource {} has no eligible states",
            resource.id
        )));
    }
    if let Some(end) = resource.end_date {
        if end < resource.start_date {
            return Err(ValidationError::new(format!(
                "resource {} availability window ends {} before it starts {}",
                resource.id, end, resource.start_date
            )));
        }
    }
    Ok(())
}

pub fn validate_demand(demand: &Demand) -> Result<(), ValidationError> {
    let key = &demand.key;
    for (field, value) in [
        ("platform", &key.platform),
        ("locality", &key.locality),
        ("state", &key.state),
        ("case_type", &key.case_type),
        ("line_of_business", &key.line_of_business),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::new(format!(
                "demand {key} has empty {field}"
            )));
        }
    }
    if !demand.hourly_rate.is_finite() || demand.hourly_rate < 0.0 {
        return Err(ValidationError::new(format!(
            "demand {key} has invalid hourly_rate {}",
            demand.hourly_rate
        )));
    }
    Ok(())
}

pub fn validate_resources(resources: &[Resource]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(resources.len());
    for resource in resources {
        if !seen.insert(resource.id.as_str()) {
            return Err(ValidationError::new(format!(
                "duplicate resource id {}",
                resource.id
            )));
        }
        validate_resource(resource)?;
    }
    Ok(())
}

pub fn validate_demands(demands: &[Demand]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(demands.len());
    for demand in demands {
        if !seen.insert(&demand.key) {
            return Err(ValidationError::new(format!(
                "duplicate demand key {}",
                demand.key
            )));
        }
        validate_demand(demand)?;
    }
    Ok(())
}
