mod admins;
mod badges;
mod businesses;
mod customers;
mod documents;
mod social_links;

use std::{borrow::Cow, time::Duration};

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, Executor, PgPool,
};

pub use badges::BadgeReviewOutcome;
pub use businesses::BusinessFilter;

/// Column list shared by every query returning a [`crate::models::Business`].
pub(crate) const BUSINESS_COLUMNS: &str = r#"
    id,
    slug,
    business_name,
    email,
    password_hash,
    description,
    category,
    website,
    phone,
    logo_url,
    verification_status,
    is_approved,
    is_verified,
    suspended_at,
    disabled_at,
    policy_code,
    policy_violation_text,
    nudge_message,
    last_nudge_at,
    community_support_text,
    community_support_links,
    created_at,
    updated_at
"#;

/// SQL mirror of [`crate::verification::resolve_status`].
pub(crate) const RESOLVED_STATUS_SQL: &str = r#"COALESCE(
    verification_status::text,
    CASE
        WHEN disabled_at IS NOT NULL THEN 'disabled'
        WHEN suspended_at IS NOT NULL THEN 'suspended'
        ELSE 'active'
    END
)"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = match pool_options().connect(database_url).await {
            Ok(pool) => pool,
            Err(sqlx::Error::Database(db_err)) if db_err.code() == Some(Cow::Borrowed("3D000")) => {
                log::info!("Database missing, attempting to create it");
                create_database_if_missing(database_url).await?;
                pool_options().connect(database_url).await?
            }
            Err(err) => return Err(err),
        };

        sqlx::migrate!("./migrations").run(&pool).await?;

        log::info!("Database connection established and migrations applied");
        Ok(Self { pool })
    }

    /// Pool that only dials the server on first use.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = pool_options().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Some(Duration::from_secs(600)))
        .test_before_acquire(true)
}

async fn create_database_if_missing(database_url: &str) -> Result<(), sqlx::Error> {
    let options: PgConnectOptions = database_url.parse()?;
    let database_name = options
        .get_database()
        .map(|name| name.to_string())
        .unwrap_or_else(|| "postgres".to_string());

    if database_name.eq_ignore_ascii_case("postgres") {
        return Ok(());
    }

    let maintenance_options = options.clone().database("postgres");
    let mut connection = sqlx::postgres::PgConnection::connect_with(&maintenance_options).await?;

    let escaped_name = database_name.replace('"', "\"\"");
    let create_stmt = format!("CREATE DATABASE \"{}\"", escaped_name);

    match connection.execute(create_stmt.as_str()).await {
        Ok(_) => {
            log::info!("Created database '{}'", database_name);
            Ok(())
        }
        Err(sqlx::Error::Database(db_err)) if db_err.code() == Some(Cow::Borrowed("42P04")) => {
            log::info!("Database '{}' already exists", database_name);
            Ok(())
        }
        Err(err) => Err(err),
    }
}
