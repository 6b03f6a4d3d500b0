pub mod models;

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use tokio::sync::OnceCell;

static DB_POOL: OnceCell<Arc<PgPool>> = OnceCell::const_new();

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/portfolio_cms".to_string()),
            max_connections: std::env::var("DB_POOL_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: std::env::var("DB_POOL_MIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            connect_timeout_secs: std::env::var("DB_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            idle_timeout_secs: std::env::var("DB_IDLE_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        }
    }
}

pub async fn init_pool(config: Option<DbConfig>) -> Result<Arc<PgPool>, sqlx::Error> {
    let config = config.unwrap_or_default();

    tracing::info!("Initializing database connection pool...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(std::time::Duration::from_secs(3))
        .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(std::time::Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::info!("Database connection pool initialized successfully");

    let pool = Arc::new(pool);
    let _ = DB_POOL.set(pool.clone());

    Ok(pool)
}

pub fn get_pool() -> Option<Arc<PgPool>> {
    DB_POOL.get().cloned()
}

pub async fn health_check() -> Result<std::time::Duration, sqlx::Error> {
    let pool = get_pool()
        .ok_or_else(|| sqlx::Error::Configuration("Database pool not initialized".into()))?;

    let start = std::time::Instant::now();
    sqlx::query("SELECT 1").fetch_one(pool.as_ref()).await?;

    Ok(start.elapsed())
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            short_description TEXT NOT NULL DEFAULT '',
            hero_image TEXT,
            hero_image_url TEXT,
            logo TEXT,
            logo_url TEXT,
            industry TEXT NOT NULL DEFAULT '',
            video TEXT,
            video_url TEXT,
            client TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL DEFAULT '',
            website_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_projects_created_at
            ON projects(created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS project_images (
            id BIGSERIAL PRIMARY KEY,
            project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            image TEXT NOT NULL,
            is_gif BOOLEAN NOT NULL DEFAULT false
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS project_sections (
            id BIGSERIAL PRIMARY KEY,
            project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            "order" INTEGER NOT NULL DEFAULT 0 CHECK ("order" >= 0),
            type TEXT NOT NULL,
            title TEXT,
            subtitle TEXT,
            content TEXT,
            theme TEXT NOT NULL DEFAULT 'light',
            cta_text TEXT,
            cta_url TEXT,
            image TEXT,
            image_url TEXT,
            video TEXT,
            video_url TEXT,
            extra JSONB
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_project_sections_project_order
            ON project_sections(project_id, "order")
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_metrics (
            id BIGSERIAL PRIMARY KEY,
            section_id BIGINT NOT NULL REFERENCES project_sections(id) ON DELETE CASCADE,
            "order" INTEGER NOT NULL DEFAULT 0 CHECK ("order" >= 0),
            value TEXT NOT NULL,
            label TEXT NOT NULL,
            description TEXT
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_features (
            id BIGSERIAL PRIMARY KEY,
            section_id BIGINT NOT NULL REFERENCES project_sections(id) ON DELETE CASCADE,
            "order" INTEGER NOT NULL DEFAULT 0 CHECK ("order" >= 0),
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            icon_text TEXT,
            icon_image TEXT,
            style TEXT NOT NULL DEFAULT 'portrait',
            background_image TEXT,
            background_image_url TEXT,
            background_color TEXT,
            text_color TEXT,
            modal_title TEXT,
            modal_description TEXT,
            modal_image TEXT,
            modal_video_url TEXT,
            modal_content TEXT
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_tiles (
            id BIGSERIAL PRIMARY KEY,
            section_id BIGINT NOT NULL REFERENCES project_sections(id) ON DELETE CASCADE,
            "order" INTEGER NOT NULL DEFAULT 0 CHECK ("order" >= 0),
            icon_text TEXT,
            icon_image TEXT,
            title TEXT NOT NULL,
            body TEXT NOT NULL DEFAULT '',
            action_text TEXT,
            action_url TEXT
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_specs (
            id BIGSERIAL PRIMARY KEY,
            section_id BIGINT NOT NULL REFERENCES project_sections(id) ON DELETE CASCADE,
            "order" INTEGER NOT NULL DEFAULT 0 CHECK ("order" >= 0),
            label TEXT NOT NULL,
            value TEXT NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_faqs (
            id BIGSERIAL PRIMARY KEY,
            section_id BIGINT NOT NULL REFERENCES project_sections(id) ON DELETE CASCADE,
            "order" INTEGER NOT NULL DEFAULT 0 CHECK ("order" >= 0),
            question TEXT NOT NULL,
            answer TEXT NOT NULL
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS section_media_tabs (
            id BIGSERIAL PRIMARY KEY,
            section_id BIGINT NOT NULL REFERENCES project_sections(id) ON DELETE CASCADE,
            "order" INTEGER NOT NULL DEFAULT 0 CHECK ("order" >= 0),
            title TEXT NOT NULL,
            subtitle TEXT,
            description TEXT,
            image TEXT,
            image_url TEXT,
            video_url TEXT
        )
    "#,
    )
    .execute(pool)
    .await?;

    // One index per child table keeps ordered per-section lookups cheap.
    for index_sql in [
        r#"CREATE INDEX IF NOT EXISTS idx_section_metrics_section ON section_metrics(section_id, "order")"#,
        r#"CREATE INDEX IF NOT EXISTS idx_section_features_section ON section_features(section_id, "order")"#,
        r#"CREATE INDEX IF NOT EXISTS idx_section_tiles_section ON section_tiles(section_id, "order")"#,
        r#"CREATE INDEX IF NOT EXISTS idx_section_specs_section ON section_specs(section_id, "order")"#,
        r#"CREATE INDEX IF NOT EXISTS idx_section_faqs_section ON section_faqs(section_id, "order")"#,
        r#"CREATE INDEX IF NOT EXISTS idx_section_media_tabs_section ON section_media_tabs(section_id, "order")"#,
    ] {
        sqlx::query(index_sql).execute(pool).await?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_posts (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            excerpt TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL,
            cover_image TEXT,
            tags TEXT NOT NULL DEFAULT '',
            estimated_read_time TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_blog_posts_created_at
            ON blog_posts(created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inquiries (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            message TEXT NOT NULL,
            type TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
    "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_inquiries_created_at
            ON inquiries(created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_default_uses_env_or_fallback() {
        let config = DbConfig::default();
        assert!(config.max_connections >= 1);
        assert!(config.connect_timeout_secs >= 1);
        assert!(config.idle_timeout_secs >= 1);
        assert!(!config.url.is_empty());
    }

    #[tokio::test]
    async fn test_health_check_fails_without_pool() {
        let result = health_check().await;
        assert!(result.is_err());
    }
}
