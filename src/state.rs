use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::contact::repo::{MessageRepo, PgMessageRepo};
use crate::db;
use crate::mail::{Mailer, SmtpMailer};
use crate::storage::{LocalStorage, StorageClient, UPLOADS_MOUNT};
use std::sync::Arc;

/// Everything a handler may touch, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub messages: Arc<dyn MessageRepo>,
    pub storage: Arc<dyn StorageClient>,
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await;

        let storage = Arc::new(LocalStorage::create(&config.upload_dir, UPLOADS_MOUNT).await?)
            as Arc<dyn StorageClient>;

        let mailer = match &config.mail {
            Some(mail) => Some(Arc::new(SmtpMailer::new(mail)?) as Arc<dyn Mailer>),
            None => {
                tracing::info!("EMAIL_USER/EMAIL_PASS not set; contact notifications disabled");
                None
            }
        };

        Ok(Self {
            users: Arc::new(PgUserRepo::new(pool.clone())),
            messages: Arc::new(PgMessageRepo::new(pool)),
            config,
            storage,
            mailer,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        messages: Arc<dyn MessageRepo>,
        storage: Arc<dyn StorageClient>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        Self {
            config,
            users,
            messages,
            storage,
            mailer,
        }
    }
}
