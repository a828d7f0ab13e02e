use crate::{
    routes::{
        api::{delete_student, get_student, get_students, post_student, put_student},
        sse::sse_feed,
        students::{
            get_student_page, get_students_page, internal_delete_student, internal_get_details,
            internal_get_form, internal_get_table, internal_post_close_form, internal_post_form,
        },
    },
    state::RosterState,
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod api;
pub mod sse;
pub mod students;

/// Student payloads are small, anything bigger than this is refused before it's parsed.
const BODY_LIMIT: usize = 64 * 1024;

pub fn router(state: RosterState) -> Router {
    Router::new()
        .route("/students", get(get_students).post(post_student))
        .route(
            "/students/{id}",
            get(get_student).put(put_student).delete(delete_student),
        )
        .route("/", get(get_students_page))
        .route("/student/{id}", get(get_student_page))
        .route("/internal/students", delete(internal_delete_student))
        .route("/internal/students/table", get(internal_get_table))
        .route(
            "/internal/students/form",
            get(internal_get_form).post(internal_post_form),
        )
        .route(
            "/internal/students/form/close",
            post(internal_post_close_form),
        )
        .route("/internal/students/details", get(internal_get_details))
        .route("/sse_feed", get(sse_feed))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
