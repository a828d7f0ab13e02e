//! The client state container: the record list the table shows and the record
//! loaded into the edit form.
//!
//! Nothing here patches the list in place. Every mutation goes through the
//! source and is followed by [`StudentStore::invalidate_and_refetch`], so the
//! list is always a copy of what the server last said.

use crate::{
    client::StudentSource,
    data::student::{Student, StudentForm},
    error::RosterResult,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub records: Vec<Student>,
    pub selected: Option<Student>,
    /// Set when a mutation went through but the refetch after it did not.
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentAction {
    RecordsDidLoad(Vec<Student>),
    SelectionDidLoad(Student),
    SelectionClear,
    Invalidate,
}

/// Returns `true` if the state changed.
pub fn reducer(state: &mut ClientState, action: StudentAction) -> bool {
    match action {
        StudentAction::RecordsDidLoad(records) => {
            let changed = state.records != records || state.stale;
            state.records = records;
            state.stale = false;
            changed
        }
        StudentAction::SelectionDidLoad(student) => {
            let changed = state.selected.as_ref() != Some(&student);
            state.selected = Some(student);
            changed
        }
        StudentAction::SelectionClear => state.selected.take().is_some(),
        StudentAction::Invalidate => !std::mem::replace(&mut state.stale, true),
    }
}

#[derive(Debug, Clone)]
pub struct StudentStore {
    state: ClientState,
    source: Arc<dyn StudentSource>,
}

impl StudentStore {
    pub fn new(source: Arc<dyn StudentSource>) -> Self {
        Self {
            state: ClientState::default(),
            source,
        }
    }

    pub fn dispatch(&mut self, action: StudentAction) -> bool {
        reducer(&mut self.state, action)
    }

    pub const fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn records(&self) -> &[Student] {
        &self.state.records
    }

    pub const fn selected(&self) -> Option<&Student> {
        self.state.selected.as_ref()
    }

    pub const fn is_stale(&self) -> bool {
        self.state.stale
    }

    /// Re-fetch the whole list and replace what we hold.
    pub async fn refresh(&mut self) -> RosterResult<()> {
        let records = self.source.list_students().await?;
        self.dispatch(StudentAction::RecordsDidLoad(records));
        Ok(())
    }

    /// Fetch one record and make it the selection. The list is left alone.
    pub async fn select_for_edit(&mut self, id: Uuid) -> RosterResult<Student> {
        let student = self.source.get_student(id).await?;
        self.dispatch(StudentAction::SelectionDidLoad(student.clone()));
        Ok(student)
    }

    /// Fetch one record for display only. Neither the list nor the selection changes.
    pub async fn fetch_one(&self, id: Uuid) -> RosterResult<Student> {
        self.source.get_student(id).await
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(StudentAction::SelectionClear);
    }

    /// Mark the list as out of date and fetch it again.
    ///
    /// A failed refetch leaves the old list in place with `stale` set; it is
    /// logged but not returned, since the mutation before it already happened.
    pub async fn invalidate_and_refetch(&mut self) {
        self.dispatch(StudentAction::Invalidate);
        if let Err(e) = self.refresh().await {
            warn!(?e, "refetch after mutation failed, list is stale");
        }
    }

    pub async fn create(&mut self, form: &StudentForm) -> RosterResult<Student> {
        let student = self.source.create_student(form).await?;
        info!(id = %student.id, "created student");
        self.invalidate_and_refetch().await;
        Ok(student)
    }

    pub async fn update(&mut self, id: Uuid, form: &StudentForm) -> RosterResult<Student> {
        let student = self.source.update_student(id, form).await?;
        info!(%id, "updated student");
        self.invalidate_and_refetch().await;
        Ok(student)
    }

    pub async fn delete(&mut self, id: Uuid) -> RosterResult<()> {
        self.source.delete_student(id).await?;
        info!(%id, "deleted student");
        if self.selected().is_some_and(|s| s.id == id) {
            self.clear_selection();
        }
        self.invalidate_and_refetch().await;
        Ok(())
    }

    /// Drop everything held locally. The source is kept.
    pub fn reset(&mut self) {
        self.state = ClientState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::InProcessSource,
        data::{RecordStore, memory_store::MemoryStore, student::tests::john},
        error::{ErrorKind, RosterError},
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn form(first_name: &str, email: &str) -> StudentForm {
        let mut payload = john();
        payload.first_name = Some(first_name.into());
        payload.email = Some(email.into());
        payload.validate().unwrap()
    }

    fn store_over(memory: Arc<MemoryStore>) -> StudentStore {
        StudentStore::new(Arc::new(InProcessSource::new(memory)))
    }

    #[tokio::test]
    async fn create_grows_the_list_by_exactly_one() {
        let memory = Arc::new(MemoryStore::new());
        memory.insert(form("Sara", "sara@example.com")).await.unwrap();
        let mut store = store_over(memory);

        store.refresh().await.unwrap();
        let before = store.records().len();

        let created = store
            .create(&form("John", "john@example.com"))
            .await
            .unwrap();
        assert_eq!(store.records().len(), before + 1);
        assert_eq!(store.records()[0], created);
        assert!(!store.is_stale());
    }

    #[tokio::test]
    async fn failed_create_leaves_the_list_untouched() {
        let memory = Arc::new(MemoryStore::new());
        memory.insert(form("John", "john@example.com")).await.unwrap();
        let mut store = store_over(memory);
        store.refresh().await.unwrap();

        let err = store
            .create(&form("Johnny", "john@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn select_then_clear() {
        let memory = Arc::new(MemoryStore::new());
        let john = memory.insert(form("John", "john@example.com")).await.unwrap();
        let mut store = store_over(memory);

        assert_eq!(store.select_for_edit(john.id).await.unwrap(), john);
        assert_eq!(store.selected(), Some(&john));
        // selecting never loads the list
        assert!(store.records().is_empty());

        store.clear_selection();
        assert_eq!(store.selected(), None);
    }

    #[tokio::test]
    async fn fetching_for_display_leaves_the_state_alone() {
        let memory = Arc::new(MemoryStore::new());
        let john = memory.insert(form("John", "john@example.com")).await.unwrap();
        let store = store_over(memory);

        assert_eq!(store.fetch_one(john.id).await.unwrap(), john);
        assert_eq!(store.state(), &ClientState::default());

        let err = store.fetch_one(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn selecting_a_missing_record_keeps_the_old_selection() {
        let memory = Arc::new(MemoryStore::new());
        let john = memory.insert(form("John", "john@example.com")).await.unwrap();
        let mut store = store_over(memory);
        store.select_for_edit(john.id).await.unwrap();

        let err = store.select_for_edit(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.selected(), Some(&john));
    }

    #[tokio::test]
    async fn update_keeps_the_id_and_refreshes() {
        let memory = Arc::new(MemoryStore::new());
        let john = memory.insert(form("John", "john@example.com")).await.unwrap();
        let mut store = store_over(memory);
        store.refresh().await.unwrap();

        let updated = store
            .update(john.id, &form("Jonathan", "jonathan@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.id, john.id);
        assert_eq!(store.records()[0].first_name, "Jonathan");
        assert_eq!(store.records()[0].email, "jonathan@example.com");
    }

    #[tokio::test]
    async fn deleting_the_selected_record_clears_the_selection() {
        let memory = Arc::new(MemoryStore::new());
        let john = memory.insert(form("John", "john@example.com")).await.unwrap();
        let mut store = store_over(memory.clone());
        store.select_for_edit(john.id).await.unwrap();

        store.delete(john.id).await.unwrap();
        assert_eq!(store.selected(), None);
        assert!(store.records().is_empty());
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn deleting_an_unknown_id_is_not_found() {
        let memory = Arc::new(MemoryStore::new());
        memory.insert(form("John", "john@example.com")).await.unwrap();
        let mut store = store_over(memory.clone());
        store.refresh().await.unwrap();

        let err = store.delete(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.records().len(), 1);
        assert_eq!(memory.len().await, 1);
    }

    /// Lets writes through but can be told to fail every list call.
    #[derive(Debug)]
    struct FlakyListing {
        inner: InProcessSource,
        fail_listing: AtomicBool,
    }

    #[async_trait]
    impl StudentSource for FlakyListing {
        async fn list_students(&self) -> RosterResult<Vec<Student>> {
            if self.fail_listing.load(Ordering::SeqCst) {
                return Err(RosterError::Api {
                    status: 500,
                    kind: ErrorKind::Transient,
                    message: "down".into(),
                });
            }
            self.inner.list_students().await
        }

        async fn get_student(&self, id: Uuid) -> RosterResult<Student> {
            self.inner.get_student(id).await
        }

        async fn create_student(&self, form: &StudentForm) -> RosterResult<Student> {
            self.inner.create_student(form).await
        }

        async fn update_student(&self, id: Uuid, form: &StudentForm) -> RosterResult<Student> {
            self.inner.update_student(id, form).await
        }

        async fn delete_student(&self, id: Uuid) -> RosterResult<()> {
            self.inner.delete_student(id).await
        }
    }

    #[tokio::test]
    async fn failed_refetch_marks_the_list_stale_until_the_next_refresh() {
        let source = Arc::new(FlakyListing {
            inner: InProcessSource::new(Arc::new(MemoryStore::new())),
            fail_listing: AtomicBool::new(true),
        });
        let mut store = StudentStore::new(source.clone());

        let created = store
            .create(&form("John", "john@example.com"))
            .await
            .unwrap();
        assert!(store.is_stale());
        assert!(store.records().is_empty());

        source.fail_listing.store(false, Ordering::SeqCst);
        store.refresh().await.unwrap();
        assert!(!store.is_stale());
        assert_eq!(store.records(), &[created]);
    }

    #[test]
    fn reducer_reports_changes() {
        let mut state = ClientState::default();
        assert!(!reducer(&mut state, StudentAction::SelectionClear));
        assert!(!reducer(&mut state, StudentAction::RecordsDidLoad(vec![])));
        assert!(reducer(&mut state, StudentAction::Invalidate));
        assert!(!reducer(&mut state, StudentAction::Invalidate));
        assert!(reducer(&mut state, StudentAction::RecordsDidLoad(vec![])));
        assert!(!state.stale);
    }

    #[tokio::test]
    async fn reset_forgets_everything() {
        let memory = Arc::new(MemoryStore::new());
        let john = memory.insert(form("John", "john@example.com")).await.unwrap();
        let mut store = store_over(memory);
        store.refresh().await.unwrap();
        store.select_for_edit(john.id).await.unwrap();

        store.reset();
        assert_eq!(store.state(), &ClientState::default());
    }
}
