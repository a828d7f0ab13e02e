#![allow(dead_code)]

use roster::{
    config::RuntimeConfiguration,
    data::{SharedStore, memory_store::MemoryStore},
    routes::router,
    state::RosterState,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the whole app over an in-memory store on a free local port.
pub async fn spawn_app() -> (String, RosterState) {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let state = RosterState::with_store(store, RuntimeConfiguration::in_memory()).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base_url, state)
}

pub fn john() -> Value {
    json!({
        "firstName": "John",
        "middleName": "K",
        "lastName": "Doe",
        "email": "john@example.com",
        "contactNumber": 9_876_543_210_u64,
        "gender": "male",
        "collegeName": "Depstar",
        "department": "IT",
        "hobbies": ["Cycling", "Reading"],
        "dob": "10/08/2001"
    })
}

pub fn sara() -> Value {
    json!({
        "firstName": "Sara",
        "middleName": "M",
        "lastName": "Shah",
        "email": "sara@example.com",
        "contactNumber": "9123456780",
        "gender": "female",
        "collegeName": "LJ Institute",
        "department": "CE",
        "hobbies": "Yoga, Painting",
        "dob": "02/03/2002"
    })
}
