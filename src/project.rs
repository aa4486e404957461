//! # Project: Record Types and Field Validation
//!
//! A [`Project`] is one tracked engineering project: an externally meaningful
//! project number, the owning team and engineer, the customer, a free-text
//! name, and a completion percentage. The integer `id` is assigned by the
//! store on creation and never supplied by callers.
//!
//! ## Field Constraints
//!
//! | Field | Type | Bounds |
//! |-------|------|--------|
//! | `project_number` | string | 14–17 characters, unique |
//! | `team` | string | 2–3 characters |
//! | `engineer` | string | 1–50 characters |
//! | `customer` | string | 1–50 characters |
//! | `project_name` | string | 1–100 characters |
//! | `progress` | integer | 0–100 inclusive |
//!
//! Lengths are counted in characters, not bytes. `progress` is the only field
//! that may change after creation.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, RegistryError};

pub const PROJECT_NUMBER_LEN: RangeInclusive<usize> = 14..=17;
pub const TEAM_LEN: RangeInclusive<usize> = 2..=3;
pub const ENGINEER_LEN: RangeInclusive<usize> = 1..=50;
pub const CUSTOMER_LEN: RangeInclusive<usize> = 1..=50;
pub const PROJECT_NAME_LEN: RangeInclusive<usize> = 1..=100;
pub const PROGRESS_RANGE: RangeInclusive<i64> = 0..=100;

/// A stored project record. Maps onto a row of the `pim` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub project_number: String,
    pub team: String,
    pub engineer: String,
    pub customer: String,
    pub project_name: String,
    pub progress: i32,
}

impl Project {
    pub fn is_on_team(&self, team: &str) -> bool {
        fold_eq(&self.team, team)
    }

    pub fn is_assigned_to(&self, engineer: &str) -> bool {
        fold_eq(&self.engineer, engineer)
    }
}

/// Candidate record for creation. Any `id` in the incoming JSON is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub project_number: String,
    pub team: String,
    pub engineer: String,
    pub customer: String,
    pub project_name: String,
    pub progress: i64,
}

impl NewProject {
    /// Check every field constraint, reporting all violations at once.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "project_number", &self.project_number, PROJECT_NUMBER_LEN);
        check_len(&mut errors, "team", &self.team, TEAM_LEN);
        check_len(&mut errors, "engineer", &self.engineer, ENGINEER_LEN);
        check_len(&mut errors, "customer", &self.customer, CUSTOMER_LEN);
        check_len(&mut errors, "project_name", &self.project_name, PROJECT_NAME_LEN);
        if let Err(e) = progress_in_range(self.progress) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Validation(errors))
        }
    }

    /// Validate and attach the assigned identifier.
    pub fn into_project(self, id: i64) -> Result<Project, RegistryError> {
        self.validate()?;
        let progress = validate_progress(self.progress)?;
        Ok(Project {
            id,
            project_number: self.project_number,
            team: self.team,
            engineer: self.engineer,
            customer: self.customer,
            project_name: self.project_name,
            progress,
        })
    }
}

/// Body of `PUT /update-progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub project_number: String,
    pub progress: i64,
}

impl ProgressUpdate {
    /// Returns the progress narrowed to its stored width.
    pub fn validate(&self) -> Result<i32, RegistryError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "project_number", &self.project_number, PROJECT_NUMBER_LEN);
        if let Err(e) = progress_in_range(self.progress) {
            errors.push(e);
        }
        if !errors.is_empty() {
            return Err(RegistryError::Validation(errors));
        }
        validate_progress(self.progress)
    }
}

/// Identifiers are positive.
pub fn validate_id(id: i64) -> Result<(), RegistryError> {
    if id < 1 {
        return Err(RegistryError::invalid("id", "must be a positive integer"));
    }
    Ok(())
}

pub fn validate_project_number(project_number: &str) -> Result<(), RegistryError> {
    let mut errors = Vec::new();
    check_len(&mut errors, "project_number", project_number, PROJECT_NUMBER_LEN);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::Validation(errors))
    }
}

pub fn validate_progress(progress: i64) -> Result<i32, RegistryError> {
    progress_in_range(progress).map_err(|e| RegistryError::Validation(vec![e]))?;
    i32::try_from(progress).map_err(|_| RegistryError::invalid("progress", "out of range"))
}

fn progress_in_range(progress: i64) -> Result<(), FieldError> {
    if PROGRESS_RANGE.contains(&progress) {
        Ok(())
    } else {
        Err(FieldError {
            field: "progress",
            message: format!(
                "must be between {} and {}, got {}",
                PROGRESS_RANGE.start(),
                PROGRESS_RANGE.end(),
                progress
            ),
        })
    }
}

fn check_len(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    bounds: RangeInclusive<usize>,
) {
    let len = value.chars().count();
    if !bounds.contains(&len) {
        errors.push(FieldError {
            field,
            message: format!(
                "must be {} to {} characters, got {}",
                bounds.start(),
                bounds.end(),
                len
            ),
        });
    }
}

/// Case-insensitive equality used by every textual filter.
///
/// Folds with per-character `to_lowercase`, as PostgreSQL's `lower()` does.
/// Multi-character folds such as `ß` to `ss` are not applied.
pub fn fold_eq(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// The five sample projects the service ships with.
pub fn demo_projects() -> Vec<NewProject> {
    [
        ("QKPH-TEST-0001", "IOT", "Louie", "DNPH", "Traceability", 50),
        ("QKPH-TEST-0002", "INF", "Francis", "KDDI", "Test Project 1", 60),
        ("QKPH-TEST-0003", "SEP", "Arjay", "Daiho", "Test Project 2", 40),
        ("QKPH-TEST-0004", "NET", "Francis", "DNPH", "Test Project 3", 70),
        ("QKPH-TEST-0005", "IOT", "Louie", "PMM", "Test Project 4", 90),
    ]
    .into_iter()
    .map(
        |(project_number, team, engineer, customer, project_name, progress)| NewProject {
            project_number: project_number.to_string(),
            team: team.to_string(),
            engineer: engineer.to_string(),
            customer: customer.to_string(),
            project_name: project_name.to_string(),
            progress,
        },
    )
    .collect()
}
