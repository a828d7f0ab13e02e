//! Everything on the client side of the REST layer: the HTTP client, the
//! state container the UI reads from, and the list/form view models.

use crate::{
    data::{
        SharedStore,
        student::{Student, StudentForm},
    },
    error::RosterResult,
};
use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

pub mod api;
pub mod form_view;
pub mod list_view;
pub mod store;

/// Where the client state container gets its students from.
#[async_trait]
pub trait StudentSource: Debug + Send + Sync {
    async fn list_students(&self) -> RosterResult<Vec<Student>>;
    async fn get_student(&self, id: Uuid) -> RosterResult<Student>;
    async fn create_student(&self, form: &StudentForm) -> RosterResult<Student>;
    async fn update_student(&self, id: Uuid, form: &StudentForm) -> RosterResult<Student>;
    async fn delete_student(&self, id: Uuid) -> RosterResult<()>;
}

/// Talks to the record store directly, for when the UI and the REST layer share a process
/// and no `API_URL` is configured.
#[derive(Debug, Clone)]
pub struct InProcessSource {
    store: SharedStore,
}

impl InProcessSource {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StudentSource for InProcessSource {
    async fn list_students(&self) -> RosterResult<Vec<Student>> {
        self.store.get_all().await
    }

    async fn get_student(&self, id: Uuid) -> RosterResult<Student> {
        self.store.get_by_id(id).await
    }

    async fn create_student(&self, form: &StudentForm) -> RosterResult<Student> {
        self.store.insert(form.clone()).await
    }

    async fn update_student(&self, id: Uuid, form: &StudentForm) -> RosterResult<Student> {
        self.store.replace(id, form.clone()).await
    }

    async fn delete_student(&self, id: Uuid) -> RosterResult<()> {
        self.store.remove(id).await.map(|_| ())
    }
}
