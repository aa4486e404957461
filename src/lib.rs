//! # pimtrack: Project Information Tracker
//!
//! Validated CRUD over engineering project records, served over HTTP.
//!
//! The [`registry::Registry`] is the authoritative in-memory store: it
//! validates input, enforces project-number uniqueness, and assigns monotonic
//! identifiers. [`db::Database`] offers the same operations over a PostgreSQL
//! `pim` table, and [`store::Store`] picks between the two at startup.
//! [`dashboard`] exposes the store as a REST API.

pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod project;
pub mod prom_metrics;
pub mod registry;
pub mod store;

pub use error::RegistryError;
pub use project::{NewProject, ProgressUpdate, Project};
pub use registry::Registry;
pub use store::Store;
