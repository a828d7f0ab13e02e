mod common;

use common::{john, sara, spawn_app};
use reqwest::{Client, StatusCode};
use roster::{
    client::{
        api::ApiClient,
        form_view::{FormView, Rejected},
        store::StudentStore,
    },
    data::student::{StudentFormInput, StudentPayload},
    error::{ErrorKind, RosterError},
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

fn payload(value: Value) -> StudentPayload {
    serde_json::from_value(value).unwrap()
}

fn api_store(base_url: &str) -> StudentStore {
    StudentStore::new(Arc::new(ApiClient::new(base_url).unwrap()))
}

#[tokio::test]
async fn container_follows_the_server_through_a_full_lifecycle() {
    let (base_url, state) = spawn_app().await;
    let mut store = api_store(&base_url);

    store.refresh().await.unwrap();
    assert!(store.records().is_empty());

    let created = store
        .create(&payload(john()).validate().unwrap())
        .await
        .unwrap();
    assert_eq!(store.records(), &[created.clone()]);

    let selected = store.select_for_edit(created.id).await.unwrap();
    assert_eq!(selected, created);
    assert_eq!(store.selected(), Some(&created));

    let mut form = payload(john()).validate().unwrap();
    form.college_name = "LJ Institute".into();
    let updated = store.update(created.id, &form).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(store.records()[0].college_name, "LJ Institute");

    store.delete(created.id).await.unwrap();
    assert!(store.records().is_empty());
    assert_eq!(store.selected(), None);
    assert!(!store.is_stale());

    assert!(state.store().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn server_errors_come_back_typed() {
    let (base_url, _state) = spawn_app().await;
    let mut store = api_store(&base_url);

    store
        .create(&payload(john()).validate().unwrap())
        .await
        .unwrap();
    let err = store
        .create(&payload(john()).validate().unwrap())
        .await
        .unwrap_err();
    match err {
        RosterError::Api {
            status,
            kind,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(kind, ErrorKind::Conflict);
            assert_eq!(message, "Email ID john@example.com already exists");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    assert_eq!(store.records().len(), 1);

    let err = store.delete(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn edit_form_submission_goes_over_http() {
    let (base_url, _state) = spawn_app().await;
    let mut store = api_store(&base_url);

    let sara = store
        .create(&payload(sara()).validate().unwrap())
        .await
        .unwrap();
    store.create(&payload(john()).validate().unwrap()).await.unwrap();

    let selected = store.select_for_edit(sara.id).await.unwrap();
    let input = StudentFormInput {
        email: "john@example.com".into(),
        ..StudentFormInput::from_student(&selected)
    };
    let Rejected { form, error } = FormView::from_input(input.clone())
        .unwrap()
        .submit(&mut store)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Conflict);
    assert_eq!(form.values(), &input);
    assert!(store.selected().is_some());
}

#[tokio::test]
async fn html_form_creates_and_the_table_finds_it() {
    let (base_url, state) = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base_url}/internal/students/form"))
        .form(&[
            ("first_name", "John"),
            ("middle_name", "K"),
            ("last_name", "Doe"),
            ("email", "john@example.com"),
            ("contact_number", "9876543210"),
            ("gender", "male"),
            ("college_name", "Depstar"),
            ("department", "IT"),
            ("hobbies", "Cycling, Reading"),
            ("dob", "10/08/2001"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Student Added Successfully"));

    let students = state.store().get_all().await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].hobbies, vec!["Cycling", "Reading"]);

    let table = client
        .get(format!("{base_url}/internal/students/table?search=jo"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(table.contains("Doe John"));

    let table = client
        .get(format!("{base_url}/internal/students/table?search=zz"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(table.contains("No students found"));
}

#[tokio::test]
async fn rejected_html_form_stays_open() {
    let (base_url, state) = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base_url}/internal/students/form"))
        .form(&[
            ("first_name", "John"),
            ("middle_name", "K"),
            ("last_name", "Doe"),
            ("email", "john@example.com"),
            ("contact_number", "98765"),
            ("gender", "male"),
            ("college_name", "Depstar"),
            ("department", "IT"),
            ("dob", "10/08/2001"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"value="98765""#));
    assert!(body.contains("Contact number must be exactly 10 digits"));

    assert!(state.store().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn details_page_and_delete_fragment() {
    let (base_url, state) = spawn_app().await;
    let client = Client::new();

    let student = state
        .store()
        .insert(payload(john()).validate().unwrap())
        .await
        .unwrap();

    let page = client
        .get(format!("{base_url}/student/{}", student.id))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let page = page.text().await.unwrap();
    assert!(page.contains("john@example.com"));
    assert!(page.contains("Back"));

    let response = client
        .delete(format!("{base_url}/internal/students?id={}", student.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.store().get_all().await.unwrap().is_empty());

    let missing = client
        .get(format!("{base_url}/student/{}", student.id))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn viewing_a_student_does_not_select_it() {
    let (base_url, state) = spawn_app().await;
    let client = Client::new();

    let student = state
        .store()
        .insert(payload(john()).validate().unwrap())
        .await
        .unwrap();

    let page = client
        .get(format!("{base_url}/student/{}", student.id))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(state.client().await.selected().is_none());

    let card = client
        .get(format!("{base_url}/internal/students/details?id={}", student.id))
        .send()
        .await
        .unwrap();
    assert_eq!(card.status(), StatusCode::OK);
    assert!(card.text().await.unwrap().contains("john@example.com"));
    assert!(state.client().await.selected().is_none());
}

#[tokio::test]
async fn closing_the_form_clears_the_selection() {
    let (base_url, state) = spawn_app().await;
    let client = Client::new();

    let student = state
        .store()
        .insert(payload(john()).validate().unwrap())
        .await
        .unwrap();

    let form = client
        .get(format!("{base_url}/internal/students/form?id={}", student.id))
        .send()
        .await
        .unwrap();
    assert_eq!(form.status(), StatusCode::OK);
    assert!(form.text().await.unwrap().contains(">Edit<"));
    assert_eq!(
        state.client().await.selected().map(|s| s.id),
        Some(student.id)
    );

    let closed = client
        .post(format!("{base_url}/internal/students/form/close"))
        .send()
        .await
        .unwrap();
    assert_eq!(closed.status(), StatusCode::OK);
    assert!(state.client().await.selected().is_none());
}

#[tokio::test]
async fn searching_reuses_the_held_list_until_a_refetch() {
    let (base_url, state) = spawn_app().await;
    let client = Client::new();

    state
        .store()
        .insert(payload(john()).validate().unwrap())
        .await
        .unwrap();

    let table = client
        .get(format!("{base_url}/internal/students/table?search=jo"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(table.contains("No students found"));

    let table = client
        .get(format!(
            "{base_url}/internal/students/table?refetch=true&search=jo"
        ))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(table.contains("Doe John"));
    assert_eq!(state.client().await.records().len(), 1);
}
