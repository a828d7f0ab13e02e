use crate::{
    data::{
        RecordStore,
        student::{Student, StudentForm},
    },
    error::{DuplicateEmailSnafu, MissingStudentSnafu, RosterResult},
};
use async_trait::async_trait;
use snafu::{OptionExt, ensure};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps records in insertion order; used by the tests and by `DATABASE_URL=memory`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    students: RwLock<Vec<Student>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.students.read().await.is_empty()
    }
}

fn email_taken(students: &[Student], email: &str, except: Option<Uuid>) -> bool {
    students
        .iter()
        .any(|s| s.email == email && Some(s.id) != except)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_all(&self) -> RosterResult<Vec<Student>> {
        Ok(self.students.read().await.iter().rev().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RosterResult<Student> {
        self.students
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .context(MissingStudentSnafu { id })
    }

    async fn insert(&self, to_be_added: StudentForm) -> RosterResult<Student> {
        let mut students = self.students.write().await;
        ensure!(
            !email_taken(&students, &to_be_added.email, None),
            DuplicateEmailSnafu {
                email: to_be_added.email
            }
        );

        let student = to_be_added.into_student(Uuid::new_v4());
        students.push(student.clone());
        Ok(student)
    }

    async fn replace(&self, id: Uuid, replacement: StudentForm) -> RosterResult<Student> {
        let mut students = self.students.write().await;
        let index = students
            .iter()
            .position(|s| s.id == id)
            .context(MissingStudentSnafu { id })?;
        ensure!(
            !email_taken(&students, &replacement.email, Some(id)),
            DuplicateEmailSnafu {
                email: replacement.email
            }
        );

        let student = replacement.into_student(id);
        students[index] = student.clone();
        Ok(student)
    }

    async fn remove(&self, id: Uuid) -> RosterResult<Student> {
        let mut students = self.students.write().await;
        let index = students
            .iter()
            .position(|s| s.id == id)
            .context(MissingStudentSnafu { id })?;
        Ok(students.remove(index))
    }
}
