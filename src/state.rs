use crate::{
    config::RuntimeConfiguration,
    data::{StudentStore, postgres::PostgresStudentStore},
    error::RollcallResult,
};
use maud::{DOCTYPE, Markup, html};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Clone)]
pub struct RollcallState {
    store: Arc<dyn StudentStore>,
}

impl RollcallState {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn connect(config: &RuntimeConfiguration) -> RollcallResult<Self> {
        let options = PgPoolOptions::new().max_connections(config.max_connections());
        let store = PostgresStudentStore::new(options, &config.db_config()).await?;

        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &dyn StudentStore {
        self.store.as_ref()
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Students" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center justify-center text-white" {
                    (markup)
                }
            }
        }
    }

    pub async fn sensible_shutdown(&self) {
        self.store.close().await;
    }
}
