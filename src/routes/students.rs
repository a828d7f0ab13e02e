//! The server-rendered UI: the student table, the create/edit form and the details page.
//!
//! Every handler here goes through the client state container rather than the
//! record store, so the UI sees exactly what the API client sees.

use crate::{
    client::{
        form_view::{FormMode, FormView, Rejected},
        list_view::{DELETE_PROMPT, ListPage, ListView, PAGE_SIZES},
    },
    data::{
        IdForm,
        student::{Department, Gender, HOBBIES, Student, StudentFormInput},
    },
    error::{RosterError, UnknownIdSnafu},
    maud_conveniences::{
        DetailLine, INPUT_CLASSES, ToastKind, form_element, form_submit_button,
        select_form_element, simple_form_element, subtitle, table, title, toast,
    },
    routes::sse::SseEvent,
    state::RosterState,
};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use snafu::ResultExt;
use uuid::Uuid;

/// Errors from UI fragments become an error toast; the swap target is left untouched.
#[derive(Debug)]
pub struct UiError(pub RosterError);

impl From<RosterError> for UiError {
    fn from(value: RosterError) -> Self {
        Self(value)
    }
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        error!(e = ?self.0, ?kind, "UI error");

        (
            kind.status_code(),
            [("HX-Reswap", "none")],
            toast(ToastKind::Error, self.0.public_message()),
        )
            .into_response()
    }
}

pub type UiResult<T> = Result<T, UiError>;

pub async fn get_students_page(State(state): State<RosterState>) -> Markup {
    state.render(html! {
        div sse-connect="/sse_feed" class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-7xl w-full flex flex-col space-y-4" {
            div class="flex flex-row items-center justify-between" {
                (title("Student List"))
                button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/students/form" hx-target="#in_focus" {
                    "Add Student"
                }
            }
            div id="in_focus" {}
            div id="all_students" hx-get="/internal/students/table?refetch=true" hx-trigger="load, sse:crud_student" hx-include="#list_controls" {}
        }
    })
}

fn student_to_row(student: &Student) -> [Markup; 9] {
    let id = student.id;
    [
        html! {
            a class="hover:text-blue-300 underline" href={"/student/" (id)} {(student)}
        },
        html! {(student.email)},
        html! {(student.contact_number)},
        html! {(student.gender)},
        html! {(student.college_name)},
        html! {(student.department)},
        html! {(student.hobbies_joined())},
        html! {(student.dob)},
        html! {
            div class="flex flex-row space-x-2" {
                a class="bg-gray-700 hover:bg-gray-600 py-1 px-2 rounded" href={"/student/" (id)} {"View"}
                button class="bg-blue-600 hover:bg-blue-800 py-1 px-2 rounded" hx-get="/internal/students/form" hx-vals={"{\"id\": \"" (id) "\"}"} hx-target="#in_focus" {
                    "Edit"
                }
                button class="bg-red-600 hover:bg-red-800 py-1 px-2 rounded" hx-delete="/internal/students" hx-vals={"{\"id\": \"" (id) "\"}"} hx-confirm=(DELETE_PROMPT) hx-target="#in_focus" {
                    "Delete"
                }
            }
        },
    ]
}

fn render_controls(view: &ListView, page: &ListPage) -> Markup {
    html! {
        form id="list_controls" class="flex flex-row items-center justify-between rounded p-4 space-x-4" hx-get="/internal/students/table" hx-target="#all_students" hx-trigger="submit" {
            input type="hidden" name="page" value=(page.page);
            input value=(view.search) type="search" name="search" placeholder="Search..." hx-get="/internal/students/table" hx-trigger="input changed delay:500ms, keyup[key=='Enter']" hx-target="#all_students" hx-include="#list_controls" hx-vals="{\"page\": 0}" class=(INPUT_CLASSES);
            select name="page_size" hx-get="/internal/students/table" hx-trigger="change" hx-target="#all_students" hx-include="#list_controls" hx-vals="{\"page\": 0}" class="shadow border rounded py-2 px-3 bg-gray-700 border-gray-600" {
                @for size in PAGE_SIZES {
                    option value=(size) selected[size == page.page_size] {(size) " per page"}
                }
            }
        }
    }
}

fn render_pagination(page: &ListPage) -> Markup {
    let caption = page.shown_range().map_or_else(
        || format!("0 of {}", page.matching),
        |(first, last)| format!("{first}-{last} of {}", page.matching),
    );

    html! {
        div class="flex flex-row items-center justify-end space-x-4 p-4 text-gray-300" {
            span {(caption)}
            button class="bg-gray-700 hover:bg-gray-600 py-1 px-3 rounded disabled:opacity-50" disabled[!page.has_previous()] hx-get="/internal/students/table" hx-target="#all_students" hx-include="#list_controls" hx-vals={"{\"page\": " (page.page.saturating_sub(1)) "}"} {
                "Previous"
            }
            button class="bg-gray-700 hover:bg-gray-600 py-1 px-3 rounded disabled:opacity-50" disabled[!page.has_next()] hx-get="/internal/students/table" hx-target="#all_students" hx-include="#list_controls" hx-vals={"{\"page\": " (page.page + 1) "}"} {
                "Next"
            }
        }
    }
}

pub fn render_table(records: &[Student], view: &ListView, stale: bool) -> Markup {
    let page = view.project(records);
    let rows = page.rows.iter().map(|s| student_to_row(s)).collect();

    html! {
        div class="flex flex-col" {
            @if stale {
                div class="bg-yellow-100 border border-yellow-400 text-yellow-700 px-4 py-3 rounded mb-4" role="status" {
                    "The list may be out of date. It will catch up on the next change."
                }
            }
            (render_controls(view, &page))
            (table(
                subtitle("Students"),
                ["Name", "Email", "Contact", "Gender", "College", "Department", "Hobbies", "DOB", "Actions"],
                rows,
            ))
            (render_pagination(&page))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub refetch: bool,
}

/// Renders the requested page of the records the container holds.
///
/// Searching and paging only re-project those records. The list is fetched again
/// when `refetch` is set, which the page does on load and on every change event.
/// If that fetch fails the last list we had is shown alongside an error toast.
pub async fn internal_get_table(
    State(state): State<RosterState>,
    Query(view): Query<ListView>,
    Query(TableQuery { refetch }): Query<TableQuery>,
) -> Markup {
    let mut client = state.client().await;
    let refreshed = if refetch {
        client.refresh().await
    } else {
        Ok(())
    };

    let table = render_table(client.records(), &view, client.is_stale());
    match refreshed {
        Ok(()) => table,
        Err(e) => {
            error!(?e, "Unable to refresh students");
            html! {
                (table)
                (toast(ToastKind::Error, e.public_message()))
            }
        }
    }
}

fn hobby_datalist() -> Markup {
    html! {
        datalist id="hobby_options" {
            @for hobby in HOBBIES {
                option value=(hobby) {}
            }
        }
    }
}

pub fn render_form(form: &FormView) -> Markup {
    let values = form.values();

    html! {
        div class="bg-gray-900 p-6 rounded shadow-md w-full" {
            (subtitle("Student Registration Form"))
            form hx-post="/internal/students/form" hx-trigger="submit" hx-target="#in_focus" class="p-4" {
                @if let FormMode::Edit(id) = form.mode() {
                    input type="hidden" name="id" value=(id);
                }
                div class="grid grid-cols-1 md:grid-cols-3 gap-4" {
                    (simple_form_element("first_name", "First Name", true, None, Some(values.first_name.as_str())))
                    (simple_form_element("middle_name", "Middle Name", true, None, Some(values.middle_name.as_str())))
                    (simple_form_element("last_name", "Surname", true, None, Some(values.last_name.as_str())))

                    (simple_form_element("email", "Email", true, Some("email"), Some(values.email.as_str())))
                    (form_element("contact_number", "Contact", html! {
                        input required type="tel" inputmode="numeric" pattern="[0-9]{10}" maxlength="10" id="contact_number" name="contact_number" value=(values.contact_number) class=(INPUT_CLASSES);
                    }))
                    (select_form_element(
                        "gender",
                        "Gender",
                        Gender::ALL.map(|g| (g.as_str(), g.label())),
                        &values.gender,
                    ))

                    (simple_form_element("college_name", "College Name", true, None, Some(values.college_name.as_str())))
                    (select_form_element(
                        "department",
                        "Department",
                        Department::ALL.map(|d| (d.as_str(), d.label())),
                        &values.department,
                    ))
                    (form_element("dob", "DOB", html! {
                        input required type="text" placeholder="DD/MM/YYYY" id="dob" name="dob" value=(values.dob) class=(INPUT_CLASSES);
                    }))

                    (form_element("hobbies", "Hobbies (comma separated)", html! {
                        input type="text" list="hobby_options" placeholder="Cycling, Reading" id="hobbies" name="hobbies" value=(values.hobbies) class=(INPUT_CLASSES);
                        (hobby_datalist())
                    }))
                }
                div class="flex flex-row items-center space-x-4" {
                    (form_submit_button(Some(form.submit_label())))
                    button type="button" class="bg-gray-700 hover:bg-gray-600 font-bold py-2 px-4 rounded" hx-post="/internal/students/form/close" hx-target="#in_focus" {
                        "Cancel"
                    }
                }
            }
        }
    }
}

#[derive(Deserialize)]
pub struct FormQuery {
    pub id: Option<String>,
}

/// With an id the record is loaded as the selection and the form opens in edit mode.
pub async fn internal_get_form(
    State(state): State<RosterState>,
    Query(FormQuery { id }): Query<FormQuery>,
) -> UiResult<Markup> {
    let mut client = state.client().await;

    let form = match id.filter(|id| !id.trim().is_empty()) {
        Some(original) => {
            let id = Uuid::try_parse(original.trim()).context(UnknownIdSnafu { original })?;
            let selected = client.select_for_edit(id).await?;
            FormView::edit(&selected)
        }
        None => {
            client.clear_selection();
            FormView::create()
        }
    };

    Ok(render_form(&form))
}

pub async fn internal_post_form(
    State(state): State<RosterState>,
    Form(input): Form<StudentFormInput>,
) -> UiResult<(StatusCode, Markup)> {
    let form = FormView::from_input(input)?;
    let success_message = form.success_message();

    let mut client = state.client().await;
    match form.submit(&mut client).await {
        Ok(student) => {
            info!(id = %student.id, "Saved student from form");
            state.send_sse_event(SseEvent::CrudStudent);
            Ok((
                StatusCode::OK,
                html! {
                    (toast(ToastKind::Success, success_message))
                },
            ))
        }
        Err(Rejected { form, error }) => {
            warn!(?error, "Student form rejected");
            Ok((
                error.kind().status_code(),
                html! {
                    (render_form(&form))
                    (toast(ToastKind::Error, error.public_message()))
                },
            ))
        }
    }
}

pub async fn internal_post_close_form(State(state): State<RosterState>) -> Markup {
    state.client().await.clear_selection();
    html! {}
}

pub async fn internal_delete_student(
    State(state): State<RosterState>,
    Query(IdForm { id }): Query<IdForm>,
) -> UiResult<Markup> {
    state.client().await.delete(id).await?;
    state.send_sse_event(SseEvent::CrudStudent);

    Ok(html! {
        (toast(ToastKind::Success, "Student Deleted Successfully"))
    })
}

fn render_details(student: &Student) -> Markup {
    let id = student.id;
    let contact = student.contact_number.to_string();
    let hobbies = student.hobbies_joined();

    html! {
        div hx-get="/internal/students/details" hx-vals={"{\"id\": \"" (id) "\"}"} hx-trigger="sse:crud_student" hx-swap="outerHTML" class="container mx-auto" {
            div class="rounded-lg shadow-md overflow-hidden bg-gray-800 max-w-md mx-auto p-4 space-y-1" {
                (DetailLine("Name", &student.full_name()))
                (DetailLine("Email", &student.email))
                (DetailLine("Phone Number", &contact))
                (DetailLine("Gender", student.gender.as_str()))
                (DetailLine("College", &student.college_name))
                (DetailLine("Department", student.department.as_str()))
                (DetailLine("Hobbies", &hobbies))
                (DetailLine("DOB", &student.dob))
            }
        }
    }
}

pub async fn get_student_page(
    State(state): State<RosterState>,
    Path(original): Path<String>,
) -> Response {
    let found = match Uuid::try_parse(&original).context(UnknownIdSnafu { original }) {
        Ok(id) => state.client().await.fetch_one(id).await,
        Err(e) => Err(e),
    };

    match found {
        Ok(student) => state
            .render(html! {
                div sse-connect="/sse_feed" class="bg-gray-800 p-8 rounded shadow-md max-w-2xl w-full flex flex-col space-y-4" {
                    (title("Details"))
                    (render_details(&student))
                    div class="flex flex-row space-x-4 justify-center" {
                        a href="/" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {"Back"}
                        button class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/students/form" hx-vals={"{\"id\": \"" (student.id) "\"}"} hx-target="#in_focus" {
                            "Edit"
                        }
                    }
                    div id="in_focus" {}
                }
            })
            .into_response(),
        Err(e) => {
            let kind = e.kind();
            error!(?e, ?kind, "Unable to show student");
            (
                kind.status_code(),
                state.render(html! {
                    div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full flex flex-col space-y-4" {
                        (title("Student not found"))
                        p class="text-gray-300" {(e.public_message())}
                        a href="/" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded text-center" {"Back"}
                    }
                }),
            )
                .into_response()
        }
    }
}

pub async fn internal_get_details(
    State(state): State<RosterState>,
    Query(IdForm { id }): Query<IdForm>,
) -> UiResult<Markup> {
    let student = state.client().await.fetch_one(id).await?;
    Ok(render_details(&student))
}
