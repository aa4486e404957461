//! # Registry: In-Memory Authoritative Project Store
//!
//! Owns the collection of [`Project`] records and is the only place they are
//! created, mutated, or destroyed. Callers receive clones; nothing outside the
//! registry holds a writable reference.
//!
//! ## Storage
//!
//! Records live in a `BTreeMap` keyed by id. Identifiers are handed out in
//! increasing order, so map order is insertion order. A second map indexes ids
//! by exact project number, giving O(1) point lookup and update by number and
//! making the uniqueness check on create a single probe.
//!
//! ## Identifier Assignment
//!
//! `next_id = last_assigned + 1`, starting from 1. `last_assigned` is a
//! high-water mark: it only ever grows, so an id is never reused even after
//! the record holding the highest id is deleted.
//!
//! ## Concurrency
//!
//! One `RwLock` guards both maps. Lists and lookups take the shared side;
//! create, update, and delete take the exclusive side, so id assignment and
//! the uniqueness check are atomic and readers never observe a half-applied
//! mutation. A poisoned lock is recovered, since every mutation leaves both
//! maps consistent before it can panic.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::error::RegistryError;
use crate::project::{
    self, fold_eq, validate_id, validate_project_number, NewProject, ProgressUpdate, Project,
};

#[derive(Default)]
struct Inner {
    projects: BTreeMap<i64, Project>,
    by_number: HashMap<String, i64>,
    last_id: i64,
}

impl Inner {
    fn remove(&mut self, id: i64) -> Option<Project> {
        let removed = self.projects.remove(&id)?;
        self.by_number.remove(&removed.project_number);
        Some(removed)
    }
}

#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

fn read_or_recover<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_or_recover<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry by creating each candidate in order.
    pub fn with_projects(
        projects: impl IntoIterator<Item = NewProject>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for p in projects {
            registry.create(p)?;
        }
        Ok(registry)
    }

    /// Registry preloaded with the demo projects (ids 1–5).
    pub fn seeded() -> Self {
        Self::with_projects(project::demo_projects())
            .expect("demo projects are valid and distinct")
    }

    pub fn len(&self) -> usize {
        read_or_recover(&self.inner).projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn list_all(&self) -> Vec<Project> {
        read_or_recover(&self.inner)
            .projects
            .values()
            .cloned()
            .collect()
    }

    pub fn list_by_team(&self, team: &str) -> Vec<Project> {
        read_or_recover(&self.inner)
            .projects
            .values()
            .filter(|p| p.is_on_team(team))
            .cloned()
            .collect()
    }

    pub fn list_by_team_and_engineer(&self, team: &str, engineer: &str) -> Vec<Project> {
        read_or_recover(&self.inner)
            .projects
            .values()
            .filter(|p| p.is_on_team(team) && p.is_assigned_to(engineer))
            .cloned()
            .collect()
    }

    pub fn get_by_id(&self, id: i64) -> Result<Project, RegistryError> {
        validate_id(id)?;
        read_or_recover(&self.inner)
            .projects
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound)
    }

    /// Exact, case-sensitive lookup.
    pub fn get_by_number(&self, project_number: &str) -> Result<Project, RegistryError> {
        validate_project_number(project_number)?;
        let inner = read_or_recover(&self.inner);
        inner
            .by_number
            .get(project_number)
            .and_then(|id| inner.projects.get(id))
            .cloned()
            .ok_or(RegistryError::NotFound)
    }

    /// Validate, reject a duplicate project number, assign the next id, append.
    pub fn create(&self, new: NewProject) -> Result<Project, RegistryError> {
        new.validate()?;

        let mut inner = write_or_recover(&self.inner);
        if inner.by_number.contains_key(&new.project_number) {
            return Err(RegistryError::Conflict(new.project_number));
        }

        let id = inner.last_id + 1;
        let project = new.into_project(id)?;
        inner.last_id = id;
        inner.by_number.insert(project.project_number.clone(), id);
        inner.projects.insert(id, project.clone());

        info!(id, project_number = %project.project_number, "project created");
        Ok(project)
    }

    /// Set `progress` on the record with exactly this project number.
    pub fn update_progress(&self, update: &ProgressUpdate) -> Result<Project, RegistryError> {
        let progress = update.validate()?;

        let mut inner = write_or_recover(&self.inner);
        let id = *inner
            .by_number
            .get(&update.project_number)
            .ok_or(RegistryError::NotFound)?;
        let project = inner
            .projects
            .get_mut(&id)
            .ok_or(RegistryError::NotFound)?;
        let previous = project.progress;
        project.progress = progress;

        info!(
            id,
            project_number = %update.project_number,
            from = previous,
            to = progress,
            "progress updated"
        );
        Ok(project.clone())
    }

    pub fn delete_by_id(&self, id: i64) -> Result<Project, RegistryError> {
        validate_id(id)?;
        let removed = write_or_recover(&self.inner)
            .remove(id)
            .ok_or(RegistryError::NotFound)?;

        info!(id, project_number = %removed.project_number, "project deleted");
        Ok(removed)
    }

    /// Remove the oldest record whose number matches, ignoring case.
    pub fn delete_by_number(&self, project_number: &str) -> Result<Project, RegistryError> {
        let mut inner = write_or_recover(&self.inner);
        let id = inner
            .projects
            .values()
            .find(|p| fold_eq(&p.project_number, project_number))
            .map(|p| p.id)
            .ok_or(RegistryError::NotFound)?;
        let removed = inner.remove(id).ok_or(RegistryError::NotFound)?;
        drop(inner);

        info!(id, project_number = %removed.project_number, "project deleted");
        Ok(removed)
    }
}
