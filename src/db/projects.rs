//! Project CRUD over the `pim` table.
//!
//! Each method mirrors a [`Registry`](crate::registry::Registry) operation with
//! the same validation and error semantics. Unique violations on insert map to
//! `Conflict`, missing rows to `NotFound`, anything else to `Storage`.

use tracing::info;

use super::Database;
use crate::error::RegistryError;
use crate::project::{validate_id, validate_project_number, NewProject, ProgressUpdate, Project};

const COLUMNS: &str = "id, project_number, team, engineer, customer, project_name, progress";

impl Database {
    pub async fn list_projects(&self) -> Result<Vec<Project>, RegistryError> {
        let rows = sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM pim ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_projects_by_team(&self, team: &str) -> Result<Vec<Project>, RegistryError> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM pim WHERE lower(team) = lower($1) ORDER BY id"
        ))
        .bind(team)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_projects_by_team_and_engineer(
        &self,
        team: &str,
        engineer: &str,
    ) -> Result<Vec<Project>, RegistryError> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM pim
             WHERE lower(team) = lower($1) AND lower(engineer) = lower($2)
             ORDER BY id"
        ))
        .bind(team)
        .bind(engineer)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_project(&self, id: i64) -> Result<Project, RegistryError> {
        validate_id(id)?;
        sqlx::query_as::<_, Project>(&format!("SELECT {COLUMNS} FROM pim WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RegistryError::NotFound)
    }

    pub async fn get_project_by_number(
        &self,
        project_number: &str,
    ) -> Result<Project, RegistryError> {
        validate_project_number(project_number)?;
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM pim WHERE project_number = $1"
        ))
        .bind(project_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistryError::NotFound)
    }

    pub async fn create_project(&self, new: NewProject) -> Result<Project, RegistryError> {
        new.validate()?;
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO pim (project_number, team, engineer, customer, project_name, progress)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        ))
        .bind(&new.project_number)
        .bind(&new.team)
        .bind(&new.engineer)
        .bind(&new.customer)
        .bind(&new.project_name)
        .bind(new.progress as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_storage(e, &new.project_number))?;

        info!(id = project.id, project_number = %project.project_number, "project created");
        Ok(project)
    }

    pub async fn update_project_progress(
        &self,
        update: &ProgressUpdate,
    ) -> Result<Project, RegistryError> {
        let progress = update.validate()?;
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE pim SET progress = $2 WHERE project_number = $1 RETURNING {COLUMNS}"
        ))
        .bind(&update.project_number)
        .bind(progress)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistryError::NotFound)?;

        info!(
            id = project.id,
            project_number = %project.project_number,
            progress,
            "progress updated"
        );
        Ok(project)
    }

    pub async fn delete_project(&self, id: i64) -> Result<Project, RegistryError> {
        validate_id(id)?;
        let project = sqlx::query_as::<_, Project>(&format!(
            "DELETE FROM pim WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistryError::NotFound)?;

        info!(id, project_number = %project.project_number, "project deleted");
        Ok(project)
    }

    /// Delete the lowest-id row whose number matches ignoring case.
    pub async fn delete_project_by_number(
        &self,
        project_number: &str,
    ) -> Result<Project, RegistryError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "DELETE FROM pim
             WHERE id = (SELECT id FROM pim WHERE lower(project_number) = lower($1)
                         ORDER BY id LIMIT 1)
             RETURNING {COLUMNS}"
        ))
        .bind(project_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistryError::NotFound)?;

        info!(id = project.id, project_number = %project.project_number, "project deleted");
        Ok(project)
    }

    pub async fn count_projects(&self) -> Result<i64, RegistryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pim")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn conflict_or_storage(e: sqlx::Error, project_number: &str) -> RegistryError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RegistryError::Conflict(project_number.to_string());
        }
    }
    RegistryError::Storage(e)
}
