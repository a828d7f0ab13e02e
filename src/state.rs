use crate::{
    client::{InProcessSource, StudentSource, api::ApiClient, store::StudentStore},
    config::RuntimeConfiguration,
    data::{SharedStore, memory_store::MemoryStore, postgres_store::PostgresStore},
    error::RosterResult,
    routes::sse::SseEvent,
};
use maud::{DOCTYPE, Markup, html};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::sync::{
    Mutex, MutexGuard,
    broadcast::{Receiver, Sender, channel},
};

#[derive(Clone, Debug)]
pub struct RosterState {
    store: SharedStore,
    client: Arc<Mutex<StudentStore>>,
    config: RuntimeConfiguration,
    sse_events_sender: Sender<SseEvent>,
}

impl RosterState {
    pub async fn new(options: PgPoolOptions, config: RuntimeConfiguration) -> RosterResult<Self> {
        let db_config = config.db_config();
        let store: SharedStore = match db_config.get_db_path() {
            Some(db_path) => Arc::new(PostgresStore::connect(options, db_path).await?),
            None => {
                warn!("Using the in-memory store, nothing will survive a restart");
                Arc::new(MemoryStore::new())
            }
        };

        Self::with_store(store, config)
    }

    /// Build the state around an existing store. The UI's source follows `API_URL` if set.
    pub fn with_store(store: SharedStore, config: RuntimeConfiguration) -> RosterResult<Self> {
        let source: Arc<dyn StudentSource> = match config.api_url() {
            Some(api_url) => {
                info!(?api_url, "UI will talk to the student API over HTTP");
                Arc::new(ApiClient::new(api_url)?)
            }
            None => Arc::new(InProcessSource::new(store.clone())),
        };

        let (tx, _rx) = channel(16);

        Ok(Self {
            store,
            client: Arc::new(Mutex::new(StudentStore::new(source))),
            config,
            sse_events_sender: tx,
        })
    }

    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    //error responses still carry markup (toasts, re-rendered forms) that should be swapped in
                    meta name="htmx-config" content=r#"{"responseHandling":[{"code":"204","swap":false},{"code":"...","swap":true}]}"# {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Student List" }
                }
                body hx-ext="sse" class="bg-gray-900 min-h-screen flex flex-col items-center py-8 text-white" {
                    div id="toasts" class="fixed top-4 right-4 z-50 flex flex-col w-80" {}
                    (markup)
                }
            }
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// The client state container. Held for the whole of a UI interaction.
    pub async fn client(&self) -> MutexGuard<'_, StudentStore> {
        self.client.lock().await
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    pub fn subscribe_to_sse_feed(&self) -> Receiver<SseEvent> {
        self.sse_events_sender.subscribe()
    }

    pub fn send_sse_event(&self, event: SseEvent) {
        let _ = self.sse_events_sender.send(event);
    }

    pub async fn sensible_shutdown(&self) {
        info!("Closing record store");
        self.store.close().await;
    }
}
