//! Project domain model.
//!
//! # Responsibility
//! - Define the editable project record and its closed status set.
//! - Provide the single validation gate used before any write.
//!
//! # Invariants
//! - `description` is non-empty after trimming.
//! - `cost` is finite and strictly positive.
//! - Foreign keys are positive; existence is enforced by the store.
//! - `id` is store-assigned and never changes after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned project identifier.
pub type ProjectId = i64;

/// Identifier of a row in one of the lookup tables.
pub type LookupId = i64;

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    Completed,
}

impl ProjectStatus {
    /// Menu order for the two-option status prompt.
    pub const ALL: [ProjectStatus; 2] = [ProjectStatus::InProgress, ProjectStatus::Completed];

    /// Stable storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Operator-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }

    /// Parses a storage key. Returns `None` for anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for ProjectStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failures for project writes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectValidationError {
    EmptyDescription,
    NonPositiveCost(f64),
    InvalidReference { field: &'static str, value: LookupId },
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "description cannot be empty"),
            Self::NonPositiveCost(cost) => {
                write!(f, "cost must be a positive number, got {cost}")
            }
            Self::InvalidReference { field, value } => {
                write!(f, "{field} must reference a positive id, got {value}")
            }
        }
    }
}

impl Error for ProjectValidationError {}

/// Project fields as supplied by the creation flow, before an id exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub description: String,
    pub cost: f64,
    pub status: ProjectStatus,
    pub source_type_id: LookupId,
    pub region_id: LookupId,
}

impl NewProject {
    /// Checks every field invariant that can be verified without the store.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_fields(
            &self.description,
            self.cost,
            self.source_type_id,
            self.region_id,
        )
    }
}

/// Persisted project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub description: String,
    pub cost: f64,
    pub status: ProjectStatus,
    pub source_type_id: LookupId,
    pub region_id: LookupId,
}

impl Project {
    /// Attaches a store-assigned id to creation-time fields.
    pub fn from_new(id: ProjectId, fields: NewProject) -> Self {
        Self {
            id,
            description: fields.description,
            cost: fields.cost,
            status: fields.status,
            source_type_id: fields.source_type_id,
            region_id: fields.region_id,
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_fields(
            &self.description,
            self.cost,
            self.source_type_id,
            self.region_id,
        )
    }
}

/// Project joined with the labels of the rows it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectListing {
    pub project: Project,
    pub source_type_label: String,
    pub region_label: String,
}

fn validate_fields(
    description: &str,
    cost: f64,
    source_type_id: LookupId,
    region_id: LookupId,
) -> Result<(), ProjectValidationError> {
    if description.trim().is_empty() {
        return Err(ProjectValidationError::EmptyDescription);
    }
    if !cost.is_finite() || cost <= 0.0 {
        return Err(ProjectValidationError::NonPositiveCost(cost));
    }
    if source_type_id <= 0 {
        return Err(ProjectValidationError::InvalidReference {
            field: "source_type_id",
            value: source_type_id,
        });
    }
    if region_id <= 0 {
        return Err(ProjectValidationError::InvalidReference {
            field: "region_id",
            value: region_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NewProject, ProjectStatus, ProjectValidationError};

    fn sample() -> NewProject {
        NewProject {
            description: "Solar Farm".to_string(),
            cost: 1000.0,
            status: ProjectStatus::Completed,
            source_type_id: 1,
            region_id: 2,
        }
    }

    #[test]
    fn status_storage_keys_are_stable() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProjectStatus::parse("Concluded"), None);
    }

    #[test]
    fn validate_accepts_well_formed_project() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_description_and_bad_cost() {
        let mut blank = sample();
        blank.description = "   ".to_string();
        assert_eq!(
            blank.validate(),
            Err(ProjectValidationError::EmptyDescription)
        );

        let mut free = sample();
        free.cost = 0.0;
        assert!(matches!(
            free.validate(),
            Err(ProjectValidationError::NonPositiveCost(_))
        ));

        let mut not_a_number = sample();
        not_a_number.cost = f64::NAN;
        assert!(not_a_number.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_references() {
        let mut project = sample();
        project.region_id = 0;
        assert_eq!(
            project.validate(),
            Err(ProjectValidationError::InvalidReference {
                field: "region_id",
                value: 0
            })
        );
    }
}
