//! The JSON REST layer over the record store.

use crate::{
    data::student::{Student, StudentPayload},
    error::{RosterResult, UnknownIdSnafu},
    routes::sse::SseEvent,
    state::RosterState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentList {
    pub results: usize,
    pub students: Vec<Student>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: Student,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResponse {
    pub message: String,
    pub student: Student,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}

/// Ids that don't even parse can't exist, so they're a 404 like any other unknown id.
fn parse_id(original: String) -> RosterResult<Uuid> {
    Uuid::try_parse(&original).context(UnknownIdSnafu { original })
}

pub async fn get_students(State(state): State<RosterState>) -> RosterResult<Json<StudentList>> {
    let students = state.store().get_all().await?;
    Ok(Json(StudentList {
        results: students.len(),
        students,
    }))
}

pub async fn post_student(
    State(state): State<RosterState>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> RosterResult<(StatusCode, Json<SavedResponse>)> {
    let Json(payload) = payload?;
    let form = payload.validate()?;

    let student = state.store().insert(form).await?;
    info!(id = %student.id, "Student added");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok((
        StatusCode::CREATED,
        Json(SavedResponse {
            message: "Student Added Successfully!".into(),
            student,
        }),
    ))
}

pub async fn get_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<StudentResponse>> {
    let id = parse_id(id)?;
    let student = state.store().get_by_id(id).await?;
    Ok(Json(StudentResponse { student }))
}

pub async fn put_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> RosterResult<Json<SavedResponse>> {
    let id = parse_id(id)?;
    let Json(payload) = payload?;
    let form = payload.validate()?;

    let student = state.store().replace(id, form).await?;
    info!(%id, "Student updated");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok(Json(SavedResponse {
        message: "Student Updated Successfully!".into(),
        student,
    }))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<DeletedResponse>> {
    let id = parse_id(id)?;
    state.store().remove(id).await?;
    info!(%id, "Student deleted");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok(Json(DeletedResponse {
        message: "Student Deleted Successfully!".into(),
    }))
}
