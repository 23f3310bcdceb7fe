use sqlx::Row;
use uuid::Uuid;

use super::{Database, RESOLVED_STATUS_SQL};
use crate::models::{Admin, AdminRole, AdminStats};

const ADMIN_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";

impl Database {
    pub async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: AdminRole,
    ) -> Result<Admin, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO admins (id, email, password_hash, name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ADMIN_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Admin>(&sql)
            .bind(Uuid::new_v4())
            .bind(email.trim().to_ascii_lowercase())
            .bind(password_hash)
            .bind(name.trim())
            .bind(role)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn get_admin(&self, admin_id: Uuid) -> Result<Option<Admin>, sqlx::Error> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1");
        sqlx::query_as::<_, Admin>(&sql)
            .bind(admin_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, sqlx::Error> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Admin>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_admins(&self) -> Result<Vec<Admin>, sqlx::Error> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins ORDER BY created_at ASC");
        sqlx::query_as::<_, Admin>(&sql).fetch_all(&self.pool).await
    }

    pub async fn count_admins(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
    }

    pub async fn delete_admin(&self, admin_id: Uuid) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    pub async fn get_admin_stats(&self) -> Result<AdminStats, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT
                (SELECT COUNT(*) FROM businesses) AS total_businesses,
                (SELECT COUNT(*) FROM businesses WHERE {RESOLVED_STATUS_SQL} = 'active') AS active,
                (SELECT COUNT(*) FROM businesses WHERE {RESOLVED_STATUS_SQL} = 'flagged') AS flagged,
                (SELECT COUNT(*) FROM businesses WHERE {RESOLVED_STATUS_SQL} = 'suspended') AS suspended,
                (SELECT COUNT(*) FROM businesses WHERE {RESOLVED_STATUS_SQL} = 'disabled') AS disabled,
                (SELECT COUNT(*) FROM badge_requests WHERE status = 'pending') AS pending_badge_requests,
                (SELECT COUNT(*) FROM business_documents WHERE status = 'pending') AS pending_documents,
                (SELECT COUNT(*) FROM customers) AS customers
            "#
        );

        let record = sqlx::query(&sql).fetch_one(&self.pool).await?;

        Ok(AdminStats {
            total_businesses: record.try_get::<i64, _>("total_businesses")?,
            active: record.try_get::<i64, _>("active")?,
            flagged: record.try_get::<i64, _>("flagged")?,
            suspended: record.try_get::<i64, _>("suspended")?,
            disabled: record.try_get::<i64, _>("disabled")?,
            pending_badge_requests: record.try_get::<i64, _>("pending_badge_requests")?,
            pending_documents: record.try_get::<i64, _>("pending_documents")?,
            customers: record.try_get::<i64, _>("customers")?,
        })
    }
}
