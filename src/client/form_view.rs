use crate::{
    client::store::StudentStore,
    data::student::{Student, StudentFormInput},
    error::{RosterError, RosterResult, UnknownIdSnafu},
};
use snafu::ResultExt;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// The one form used for both adding and editing a student.
///
/// Whether it creates or updates is decided purely by the presence of an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    mode: FormMode,
    values: StudentFormInput,
}

/// A submission that did not go through. The form comes back with what was typed so it can stay open.
#[derive(Debug)]
pub struct Rejected {
    pub form: FormView,
    pub error: RosterError,
}

impl FormView {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            values: StudentFormInput::default(),
        }
    }

    pub fn edit(selected: &Student) -> Self {
        Self {
            mode: FormMode::Edit(selected.id),
            values: StudentFormInput::from_student(selected),
        }
    }

    /// Rebuild the form from posted fields. A blank id means create.
    pub fn from_input(values: StudentFormInput) -> RosterResult<Self> {
        let id = values.id.trim();
        let mode = if id.is_empty() {
            FormMode::Create
        } else {
            let id = Uuid::try_parse(id).context(UnknownIdSnafu { original: id })?;
            FormMode::Edit(id)
        };

        Ok(Self { mode, values })
    }

    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    pub const fn values(&self) -> &StudentFormInput {
        &self.values
    }

    pub const fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub const fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Submit",
            FormMode::Edit(_) => "Edit",
        }
    }

    pub const fn success_message(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Student Added Successfully",
            FormMode::Edit(_) => "Student Updated Successfully",
        }
    }

    /// Validate, send the whole payload in one request, and refresh the list.
    ///
    /// On success the selection is cleared, since the form closes.
    pub async fn submit(self, store: &mut StudentStore) -> Result<Student, Rejected> {
        let form = match self.values.to_payload().validate() {
            Ok(form) => form,
            Err(error) => return Err(Rejected { form: self, error }),
        };

        let result = match self.mode {
            FormMode::Create => store.create(&form).await,
            FormMode::Edit(id) => store.update(id, &form).await,
        };

        match result {
            Ok(student) => {
                store.clear_selection();
                Ok(student)
            }
            Err(error) => Err(Rejected { form: self, error }),
        }
    }
}
