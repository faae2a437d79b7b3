use std::sync::Arc;
use std::time::{Instant, SystemTime};

use sqlx::PgPool;

use crate::config::LearningConfig;
use crate::services::mailer::Mailer;
use crate::services::profanity::ProfanityFilter;
use crate::services::translator::TranslationService;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    db_pool: Option<PgPool>,
    translator: Arc<TranslationService>,
    mailer: Arc<Mailer>,
    profanity: Arc<ProfanityFilter>,
    learning: LearningConfig,
}

impl AppState {
    pub fn new(db_pool: Option<PgPool>) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            db_pool,
            translator: Arc::new(TranslationService::from_env()),
            mailer: Arc::new(Mailer::from_env()),
            profanity: Arc::new(ProfanityFilter::from_env()),
            learning: LearningConfig::from_env(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn db_pool(&self) -> Option<PgPool> {
        self.db_pool.clone()
    }

    pub fn translator(&self) -> Arc<TranslationService> {
        Arc::clone(&self.translator)
    }

    pub fn mailer(&self) -> Arc<Mailer> {
        Arc::clone(&self.mailer)
    }

    pub fn profanity(&self) -> Arc<ProfanityFilter> {
        Arc::clone(&self.profanity)
    }

    pub fn learning(&self) -> LearningConfig {
        self.learning
    }
}
