use uuid::Uuid;

use super::{Database, BUSINESS_COLUMNS};
use crate::models::{Business, Customer};

const CUSTOMER_COLUMNS: &str = "id, email, password_hash, display_name, created_at, updated_at";

impl Database {
    pub async fn create_customer(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
    ) -> Result<Customer, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO customers (id, email, password_hash, display_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Customer>(&sql)
            .bind(Uuid::new_v4())
            .bind(email.trim().to_ascii_lowercase())
            .bind(password_hash)
            .bind(display_name.trim())
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>, sqlx::Error> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Customer>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
    }

    /// Favorited businesses, most recently added first.
    pub async fn list_favorite_businesses(&self, customer_id: Uuid) -> Result<Vec<Business>, sqlx::Error> {
        let columns = BUSINESS_COLUMNS
            .split(',')
            .map(|column| format!("b.{}", column.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r#"
            SELECT {columns}
            FROM customer_favorites f
            INNER JOIN businesses b ON b.id = f.business_id
            WHERE f.customer_id = $1
            ORDER BY f.created_at DESC
            "#
        );

        sqlx::query_as::<_, Business>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Idempotent; returns whether a new row was written.
    pub async fn add_favorite(&self, customer_id: Uuid, business_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO customer_favorites (customer_id, business_id)
            VALUES ($1, $2)
            ON CONFLICT (customer_id, business_id) DO NOTHING
            "#,
        )
        .bind(customer_id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_favorite(&self, customer_id: Uuid, business_id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM customer_favorites WHERE customer_id = $1 AND business_id = $2",
        )
        .bind(customer_id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }
}
