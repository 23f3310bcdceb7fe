//! Creates the service database on a Postgres server if it is missing.

use tokio_postgres::NoTls;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let conn_str = std::env::var("PG_ADMIN_CONN")
        .unwrap_or_else(|_| "host=127.0.0.1 user=postgres dbname=postgres".into());
    let db_name = std::env::var("DB_NAME").unwrap_or_else(|_| "business_links".into());

    if !is_safe_database_name(&db_name) {
        log::error!("Refusing to create database: invalid database name '{db_name}'");
        return Ok(());
    }

    log::info!("Connecting to Postgres to manage databases");
    let (client, connection) = tokio_postgres::connect(&conn_str, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("connection error: {e}");
        }
    });

    let row = client
        .query_opt("SELECT 1 FROM pg_database WHERE datname = $1", &[&db_name])
        .await?;

    if row.is_some() {
        log::info!("Database '{db_name}' already exists");
        return Ok(());
    }

    client
        .execute(format!("CREATE DATABASE \"{db_name}\"").as_str(), &[])
        .await?;
    log::info!("Database '{db_name}' created; migrations run on first service start");

    Ok(())
}

fn is_safe_database_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 63 && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::is_safe_database_name;

    #[test]
    fn only_plain_identifiers_are_accepted() {
        assert!(is_safe_database_name("business_links"));
        assert!(!is_safe_database_name("links; DROP DATABASE postgres"));
        assert!(!is_safe_database_name("with\"quote"));
        assert!(!is_safe_database_name(""));
    }
}
