use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::repo::{MemoryUserRepo, PgUserRepo, UserRepo};
use crate::blogs::repo::{BlogRepo, MemoryBlogRepo, PgBlogRepo};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub blogs: Arc<dyn BlogRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Production wiring: Postgres-backed repositories. The pool is also
    /// returned so the caller can run migrations and back the session store
    /// with it.
    pub async fn init() -> anyhow::Result<(Self, PgPool)> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let state = Self::from_parts(
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgBlogRepo::new(db.clone())),
            config,
        );
        Ok((state, db))
    }

    pub fn from_parts(
        users: Arc<dyn UserRepo>,
        blogs: Arc<dyn BlogRepo>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            blogs,
            config,
        }
    }

    /// Test wiring: in-memory repositories, throwaway config.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryUserRepo::default()),
            Arc::new(MemoryBlogRepo::default()),
            Arc::new(AppConfig::for_tests()),
        )
    }
}
