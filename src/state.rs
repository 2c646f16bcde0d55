use std::sync::Arc;

use mongodb::Client as MongoClient;

use crate::config::Config;
use crate::mail::{Mailer, SmtpMailer};
use crate::media::{CloudinaryStorage, MediaStorage};
use crate::repositories::{
    ContactRepository, DocumentStore, EducationRepository, Entity, ExperienceRepository,
    InMemoryStore, MongoStore, ProjectRepository, Repository, SkillRepository, UserRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserRepository,
    pub skills: SkillRepository,
    pub experiences: ExperienceRepository,
    pub projects: ProjectRepository,
    pub educations: EducationRepository,
    pub contacts: ContactRepository,
    /// Remote storage for uploaded files
    pub media: Arc<dyn MediaStorage>,
    /// Outgoing mail, absent when SMTP is not configured
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    /// Create a new AppState connected to MongoDB, Cloudinary and SMTP
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let mongo_client = MongoClient::with_uri_str(&config.mongodb_url)
            .await
            .map_err(|e| AppStateError::Mongo(e.to_string()))?;
        let db = mongo_client.database(&config.mongodb_database);

        fn mongo<T: Entity>(db: &mongodb::Database) -> Repository<T> {
            let store: Arc<dyn DocumentStore<T>> = Arc::new(MongoStore::<T>::new(db));
            Repository::new(store)
        }

        let media = CloudinaryStorage::new(config.cloudinary.clone())
            .map_err(|e| AppStateError::Media(e.to_string()))?;

        let mailer: Option<Arc<dyn Mailer>> = match &config.email {
            Some(email) => {
                let smtp = SmtpMailer::new(email).map_err(|e| AppStateError::Mail(e.to_string()))?;
                let mailer: Arc<dyn Mailer> = Arc::new(smtp);
                Some(mailer)
            }
            None => {
                tracing::info!("EMAIL_HOST not set, outgoing mail disabled");
                None
            }
        };

        let state = Self {
            users: mongo(&db),
            skills: mongo(&db),
            experiences: mongo(&db),
            projects: mongo(&db),
            educations: mongo(&db),
            contacts: mongo(&db),
            media: Arc::new(media),
            mailer,
            config,
        };

        state.ensure_indexes().await?;
        Ok(state)
    }

    /// Create AppState backed by in-memory stores (for testing)
    pub fn in_memory(
        config: Config,
        media: Arc<dyn MediaStorage>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        fn memory<T: Entity>() -> Repository<T> {
            let store: Arc<dyn DocumentStore<T>> = Arc::new(InMemoryStore::<T>::new());
            Repository::new(store)
        }

        Self {
            config,
            users: memory(),
            skills: memory(),
            experiences: memory(),
            projects: memory(),
            educations: memory(),
            contacts: memory(),
            media,
            mailer,
        }
    }

    async fn ensure_indexes(&self) -> Result<(), AppStateError> {
        let index = |e: crate::error::AppError| AppStateError::Index(e.to_string());

        self.users.ensure_indexes().await.map_err(index)?;
        self.skills.ensure_indexes().await.map_err(index)?;
        self.experiences.ensure_indexes().await.map_err(index)?;
        self.projects.ensure_indexes().await.map_err(index)?;
        self.educations.ensure_indexes().await.map_err(index)?;
        self.contacts.ensure_indexes().await.map_err(index)?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("MongoDB connection error: {0}")]
    Mongo(String),

    #[error("MongoDB index error: {0}")]
    Index(String),

    #[error("Media host client error: {0}")]
    Media(String),

    #[error("Mail transport error: {0}")]
    Mail(String),
}
