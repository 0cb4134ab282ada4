//! Shared test infrastructure: a recording mock gateway and a harness
//! wiring the application context to a throwaway SQLite database.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use nslogger::config::Settings;
use nslogger::database::{connection, DatabaseService};
use nslogger::handlers::callbacks::IncomingCallback;
use nslogger::handlers::messages::IncomingMessage;
use nslogger::models::Rank;
use nslogger::services::{Keyboard, MessagingGateway, TextFormat};
use nslogger::state::AppContext;
use nslogger::Result;

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// Gateway double that records everything the console tries to send.
#[derive(Default)]
pub struct MockGateway {
    pub messages: Mutex<Vec<SentMessage>>,
    pub documents: Mutex<Vec<(i64, PathBuf, String)>>,
    pub answers: Mutex<Vec<(String, Option<String>)>>,
}

impl MockGateway {
    pub fn texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|message| message.text.clone())
            .collect()
    }

    pub fn last_message(&self) -> SentMessage {
        self.messages
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no message was sent")
    }
}

#[async_trait]
impl MessagingGateway for MockGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
        _format: TextFormat,
    ) -> Result<()> {
        self.messages.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, path: &Path, caption: &str) -> Result<()> {
        self.documents
            .lock()
            .unwrap()
            .push((chat_id, path.to_path_buf(), caption.to_string()));
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.answers
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.map(str::to_string)));
        Ok(())
    }
}

pub struct TestHarness {
    pub ctx: AppContext,
    pub gateway: Arc<MockGateway>,
    // Held so the database and log files outlive the test body.
    #[allow(dead_code)]
    pub dir: TempDir,
}

impl TestHarness {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");

        let mut settings = Settings::default();
        settings.bot.token = "123456:TEST".to_string();
        settings.storage.database_url =
            format!("sqlite://{}", dir.path().join("nslogger-test.db").display());
        settings.logs.dir = dir.path().display().to_string();
        settings.logs.watch_interval_secs = 1;
        settings.bootstrap.operators = vec!["root_op".to_string()];

        let pool = connection::create_pool(&settings.storage.database_url)
            .await
            .expect("pool");
        connection::run_migrations(&pool).await.expect("migrations");
        let db = DatabaseService::new(pool);
        db.bootstrap(&settings.bootstrap).await.expect("bootstrap");

        let gateway = Arc::new(MockGateway::default());
        let ctx = AppContext::new(settings, db, gateway.clone());

        Self { ctx, gateway, dir }
    }

    /// Register a user and make them an operator (stored rank included).
    pub async fn grant_operator(&self, username: &str, user_id: i64) {
        self.ctx.db.roles.add_operator(username).await.unwrap();
        self.ctx
            .db
            .register_user(username, user_id, Some("Op"))
            .await
            .unwrap();
        assert_eq!(self.ctx.auth.rank(username).await.unwrap(), Rank::Operator);
    }

    /// Register a plain user (stored rank `user`).
    pub async fn register_plain(&self, username: &str, user_id: i64) {
        self.ctx
            .db
            .register_user(username, user_id, Some("Plain"))
            .await
            .unwrap();
    }

    pub fn message(&self, chat_id: i64, username: &str, user_id: i64, text: &str) -> IncomingMessage {
        IncomingMessage {
            chat_id,
            username: username.to_string(),
            user_id,
            first_name: Some("Test".to_string()),
            text: text.to_string(),
        }
    }

    pub fn callback(
        &self,
        chat_id: i64,
        username: &str,
        user_id: i64,
        data: &str,
    ) -> IncomingCallback {
        IncomingCallback {
            callback_id: format!("cb-{}", chat_id),
            chat_id,
            username: username.to_string(),
            user_id,
            data: data.to_string(),
        }
    }
}
