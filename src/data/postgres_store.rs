use crate::{
    data::{
        RecordStore,
        student::{ContactNumber, Student, StudentForm},
    },
    error::{
        MakeQuerySnafu, MigrateSnafu, MissingStudentSnafu, OpenDatabaseSnafu, RosterError,
        RosterResult,
    },
};
use async_trait::async_trait;
use snafu::{OptionExt, ResultExt};
use sqlx::{FromRow, Pool, Postgres, postgres::PgPoolOptions};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct StudentRow {
    id: Uuid,
    first_name: String,
    middle_name: String,
    last_name: String,
    email: String,
    contact_number: String,
    gender: String,
    college_name: String,
    department: String,
    hobbies: Vec<String>,
    dob: String,
}

impl TryFrom<StudentRow> for Student {
    type Error = RosterError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            email: row.email,
            contact_number: ContactNumber::parse(&row.contact_number)?,
            gender: row.gender.parse()?,
            college_name: row.college_name,
            department: row.department.parse()?,
            hobbies: row.hobbies,
            dob: row.dob,
        })
    }
}

const COLUMNS: &str = "id, first_name, middle_name, last_name, email, contact_number, gender, college_name, department, hobbies, dob";

/// Unique-index violations on `email` become `DuplicateEmail`; everything else is a query error.
fn map_write_error(source: sqlx::Error, email: &str) -> RosterError {
    match &source {
        sqlx::Error::Database(db) if db.is_unique_violation() => RosterError::DuplicateEmail {
            email: email.to_string(),
        },
        _ => RosterError::MakeQuery { source },
    }
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    pub async fn connect(options: PgPoolOptions, db_path: &str) -> RosterResult<Self> {
        let pool = options.connect(db_path).await.context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn get_all(&self) -> RosterResult<Vec<Student>> {
        sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {COLUMNS} FROM public.students ORDER BY seq DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context(MakeQuerySnafu)?
        .into_iter()
        .map(Student::try_from)
        .collect()
    }

    async fn get_by_id(&self, id: Uuid) -> RosterResult<Student> {
        sqlx::query_as::<_, StudentRow>(&format!(
            "SELECT {COLUMNS} FROM public.students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)?
        .context(MissingStudentSnafu { id })?
        .try_into()
    }

    async fn insert(&self, to_be_added: StudentForm) -> RosterResult<Student> {
        let StudentForm {
            first_name,
            middle_name,
            last_name,
            email,
            contact_number,
            gender,
            college_name,
            department,
            hobbies,
            dob,
        } = to_be_added;

        sqlx::query_as::<_, StudentRow>(&format!(
            "INSERT INTO public.students ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(first_name)
        .bind(middle_name)
        .bind(last_name)
        .bind(&email)
        .bind(contact_number.as_str())
        .bind(gender.as_str())
        .bind(college_name)
        .bind(department.as_str())
        .bind(hobbies)
        .bind(dob)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &email))?
        .try_into()
    }

    async fn replace(&self, id: Uuid, replacement: StudentForm) -> RosterResult<Student> {
        let StudentForm {
            first_name,
            middle_name,
            last_name,
            email,
            contact_number,
            gender,
            college_name,
            department,
            hobbies,
            dob,
        } = replacement;

        sqlx::query_as::<_, StudentRow>(&format!(
            "UPDATE public.students SET first_name = $2, middle_name = $3, last_name = $4, email = $5, contact_number = $6, gender = $7, college_name = $8, department = $9, hobbies = $10, dob = $11 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(first_name)
        .bind(middle_name)
        .bind(last_name)
        .bind(&email)
        .bind(contact_number.as_str())
        .bind(gender.as_str())
        .bind(college_name)
        .bind(department.as_str())
        .bind(hobbies)
        .bind(dob)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &email))?
        .context(MissingStudentSnafu { id })?
        .try_into()
    }

    async fn remove(&self, id: Uuid) -> RosterResult<Student> {
        sqlx::query_as::<_, StudentRow>(&format!(
            "DELETE FROM public.students WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context(MakeQuerySnafu)?
        .context(MissingStudentSnafu { id })?
        .try_into()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::student::{Department, Gender},
        error::ErrorKind,
    };

    fn row() -> StudentRow {
        StudentRow {
            id: Uuid::new_v4(),
            first_name: "John".into(),
            middle_name: "K".into(),
            last_name: "Doe".into(),
            email: "john@example.com".into(),
            contact_number: "9876543210".into(),
            gender: "male".into(),
            college_name: "Depstar".into(),
            department: "IT".into(),
            hobbies: vec!["Cycling".into()],
            dob: "10/08/2001".into(),
        }
    }

    #[test]
    fn rows_become_students() {
        let row = row();
        let id = row.id;
        let student = Student::try_from(row).unwrap();
        assert_eq!(student.id, id);
        assert_eq!(student.gender, Gender::Male);
        assert_eq!(student.department, Department::It);
        assert_eq!(student.contact_number.as_str(), "9876543210");
        assert_eq!(student.hobbies, vec!["Cycling"]);
    }

    #[test]
    fn corrupt_rows_are_refused() {
        let bad_gender = StudentRow {
            gender: "robot".into(),
            ..row()
        };
        assert!(matches!(
            Student::try_from(bad_gender),
            Err(RosterError::InvalidGender { .. })
        ));

        let bad_number = StudentRow {
            contact_number: "12".into(),
            ..row()
        };
        assert!(matches!(
            Student::try_from(bad_number),
            Err(RosterError::InvalidContactNumber { .. })
        ));
    }

    #[test]
    fn other_write_errors_stay_query_errors() {
        let err = map_write_error(sqlx::Error::RowNotFound, "john@example.com");
        assert!(matches!(err, RosterError::MakeQuery { .. }));
        assert_eq!(err.kind(), ErrorKind::Transient);
    }
}
