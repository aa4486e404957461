//! Backend selection for the registry operations.
//!
//! The HTTP layer and the CLI talk to a [`Store`], which forwards each call to
//! either the in-memory [`Registry`] or the PostgreSQL [`Database`]. Both
//! backends validate input and report errors identically.

use crate::db::Database;
use crate::error::RegistryError;
use crate::project::{NewProject, ProgressUpdate, Project};
use crate::registry::Registry;

pub enum Store {
    Memory(Registry),
    Postgres(Database),
}

impl Store {
    pub fn backend(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Postgres(_) => "postgres",
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Project>, RegistryError> {
        match self {
            Store::Memory(r) => Ok(r.list_all()),
            Store::Postgres(db) => db.list_projects().await,
        }
    }

    pub async fn list_by_team(&self, team: &str) -> Result<Vec<Project>, RegistryError> {
        match self {
            Store::Memory(r) => Ok(r.list_by_team(team)),
            Store::Postgres(db) => db.list_projects_by_team(team).await,
        }
    }

    pub async fn list_by_team_and_engineer(
        &self,
        team: &str,
        engineer: &str,
    ) -> Result<Vec<Project>, RegistryError> {
        match self {
            Store::Memory(r) => Ok(r.list_by_team_and_engineer(team, engineer)),
            Store::Postgres(db) => db.list_projects_by_team_and_engineer(team, engineer).await,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Project, RegistryError> {
        match self {
            Store::Memory(r) => r.get_by_id(id),
            Store::Postgres(db) => db.get_project(id).await,
        }
    }

    pub async fn get_by_number(&self, project_number: &str) -> Result<Project, RegistryError> {
        match self {
            Store::Memory(r) => r.get_by_number(project_number),
            Store::Postgres(db) => db.get_project_by_number(project_number).await,
        }
    }

    pub async fn create(&self, new: NewProject) -> Result<Project, RegistryError> {
        match self {
            Store::Memory(r) => r.create(new),
            Store::Postgres(db) => db.create_project(new).await,
        }
    }

    pub async fn update_progress(&self, update: &ProgressUpdate) -> Result<Project, RegistryError> {
        match self {
            Store::Memory(r) => r.update_progress(update),
            Store::Postgres(db) => db.update_project_progress(update).await,
        }
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<Project, RegistryError> {
        match self {
            Store::Memory(r) => r.delete_by_id(id),
            Store::Postgres(db) => db.delete_project(id).await,
        }
    }

    pub async fn delete_by_number(&self, project_number: &str) -> Result<Project, RegistryError> {
        match self {
            Store::Memory(r) => r.delete_by_number(project_number),
            Store::Postgres(db) => db.delete_project_by_number(project_number).await,
        }
    }

    pub async fn count(&self) -> Result<i64, RegistryError> {
        match self {
            Store::Memory(r) => Ok(r.len() as i64),
            Store::Postgres(db) => db.count_projects().await,
        }
    }

    pub async fn health_check(&self) -> Result<(), RegistryError> {
        match self {
            Store::Memory(_) => Ok(()),
            Store::Postgres(db) => Ok(db.health_check().await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::demo_projects;

    #[tokio::test]
    async fn memory_store_forwards_to_registry() {
        let store = Store::Memory(Registry::new());
        assert_eq!(store.backend(), "memory");
        assert_eq!(store.count().await.unwrap(), 0);

        for p in demo_projects() {
            store.create(p).await.unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 5);
        assert_eq!(store.list_by_team("iot").await.unwrap().len(), 2);
        assert_eq!(
            store
                .list_by_team_and_engineer("NET", "francis")
                .await
                .unwrap()
                .len(),
            1
        );

        let removed = store.delete_by_number("QKPH-TEST-0002").await.unwrap();
        assert_eq!(removed.id, 2);
        assert!(matches!(
            store.get_by_id(2).await,
            Err(RegistryError::NotFound)
        ));
        store.health_check().await.unwrap();
    }
}
