use crate::{
    data::student::{Student, StudentForm},
    error::RosterResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};
use uuid::Uuid;

pub mod memory_store;
pub mod postgres_store;
pub mod student;

#[derive(Deserialize)]
pub struct IdForm {
    pub id: Uuid,
}

/// Persistent collection of student documents.
///
/// Every operation touches at most one record. `get_all` returns newest first.
#[async_trait]
pub trait RecordStore: Debug + Send + Sync {
    async fn get_all(&self) -> RosterResult<Vec<Student>>;
    async fn get_by_id(&self, id: Uuid) -> RosterResult<Student>;
    /// Fails with `DuplicateEmail` if another record already uses the email.
    async fn insert(&self, to_be_added: StudentForm) -> RosterResult<Student>;
    /// Full replace of every field. The id never changes.
    async fn replace(&self, id: Uuid, replacement: StudentForm) -> RosterResult<Student>;
    async fn remove(&self, id: Uuid) -> RosterResult<Student>;

    async fn close(&self) {}
}

pub type SharedStore = Arc<dyn RecordStore>;
