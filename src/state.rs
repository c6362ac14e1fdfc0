// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::{Config, DEFAULT_ADMIN_LOGIN, DEFAULT_ADMIN_PASSWORD},
    error::AppError,
    models::{
        feed::{FeedItem, FeedKind},
        quiz::TestList,
        settings::Settings,
        user::{Role, UserDirectory, UserRecord},
    },
    quiz::{QuizCatalog, QuizGrader},
    store::Document,
    utils::hash::hash_password,
};

pub type UserStore = Arc<Document<UserDirectory>>;
pub type FeedStore = Arc<Document<Vec<FeedItem>>>;
pub type SettingsStore = Arc<Document<Settings>>;

/// The three feed documents.
#[derive(Clone)]
pub struct Feeds {
    pub notes: FeedStore,
    pub news: FeedStore,
    pub guides: FeedStore,
}

impl Feeds {
    pub fn get(&self, kind: FeedKind) -> &FeedStore {
        match kind {
            FeedKind::Notes => &self.notes,
            FeedKind::News => &self.news,
            FeedKind::Guides => &self.guides,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
    pub feeds: Feeds,
    pub settings: SettingsStore,
    pub catalog: Arc<QuizCatalog>,
    pub grader: Arc<QuizGrader>,
}

impl AppState {
    /// Opens every document under `config.data_dir`, creating missing ones.
    ///
    /// The user directory is rewritten in normalized form, and seeded with an
    /// admin account when empty.
    ///
    /// Fails if a document cannot be read or written, or if the admin account
    /// cannot be seeded.
    pub async fn load(config: Config) -> Result<Self, AppError> {
        let dir = config.data_dir.clone();

        let users = Document::open(dir.join("users.json"), UserDirectory::new()).await?;
        seed_admin_user(&users, &config).await?;
        users.flush().await?;

        let open_feed = |kind: FeedKind| Document::open(dir.join(kind.file_name()), Vec::<FeedItem>::new());
        let feeds = Feeds {
            notes: Arc::new(open_feed(FeedKind::Notes).await?),
            news: Arc::new(open_feed(FeedKind::News).await?),
            guides: Arc::new(open_feed(FeedKind::Guides).await?),
        };

        let settings = Document::open(dir.join("settings.json"), Settings::default()).await?;

        let catalog = Arc::new(QuizCatalog::new(
            Document::open(dir.join("tests.json"), TestList::default()).await?,
        ));
        let grader = Arc::new(QuizGrader::new(
            catalog.clone(),
            Document::open(dir.join("results.json"), Vec::new()).await?,
        ));

        tracing::info!("Loaded documents from {}", dir.display());

        Ok(Self {
            config,
            users: Arc::new(users),
            feeds,
            settings: Arc::new(settings),
            catalog,
            grader,
        })
    }
}

async fn seed_admin_user(users: &Document<UserDirectory>, config: &Config) -> Result<(), AppError> {
    if !users.read(|dir| dir.is_empty()).await {
        return Ok(());
    }

    let login = config
        .admin_login
        .clone()
        .unwrap_or_else(|| DEFAULT_ADMIN_LOGIN.to_string());
    let password = match &config.admin_password {
        Some(password) => password.clone(),
        None => {
            tracing::warn!("ADMIN_PASSWORD not set, seeding '{}' with the default password", login);
            DEFAULT_ADMIN_PASSWORD.to_string()
        }
    };

    let hashed_password = hash_password(&password)?;

    tracing::info!("Seeding admin user: {}", login);
    users
        .update(|dir| {
            dir.insert(
                login,
                UserRecord {
                    password: hashed_password,
                    role: Role::Admin,
                },
            );
            Ok::<_, AppError>(())
        })
        .await
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for UserStore {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Feeds {
    fn from_ref(state: &AppState) -> Self {
        state.feeds.clone()
    }
}

impl FromRef<AppState> for SettingsStore {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}

impl FromRef<AppState> for Arc<QuizCatalog> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Arc<QuizGrader> {
    fn from_ref(state: &AppState) -> Self {
        state.grader.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_seeds_admin_into_empty_directory() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_data_dir(dir.path());
        config.admin_login = Some("boss".into());
        config.admin_password = Some("pass1234".into());

        let state = AppState::load(config).await.unwrap();

        let role = state.users.read(|dir| dir.get("boss").map(|u| u.role)).await;
        assert_eq!(role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn load_fails_when_admin_cannot_be_seeded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("users.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("users.json.tmp")).unwrap();

        let result = AppState::load(Config::with_data_dir(dir.path())).await;

        assert!(matches!(result, Err(AppError::InternalServerError(_))));
    }
}
